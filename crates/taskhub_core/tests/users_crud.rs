use rusqlite::Connection;
use taskhub_core::db::migrations::latest_version;
use taskhub_core::db::open_db_in_memory;
use taskhub_core::{
    EntityKind, RegisterUserRequest, RepoError, SqliteUserRepository, UpdateUserRequest, User,
    UserRepository, UserService,
};
use uuid::Uuid;

#[test]
fn register_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let created = service
        .register(&RegisterUserRequest {
            handle: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        })
        .unwrap();

    let fetched = service.get(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.full_name(), "Ada Lovelace");

    let by_handle = service.find_by_handle("ada").unwrap().unwrap();
    assert_eq!(by_handle.id, created.id);
}

#[test]
fn duplicate_handle_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let request = RegisterUserRequest {
        handle: "ada".to_string(),
        first_name: String::new(),
        last_name: String::new(),
    };
    service.register(&request).unwrap();

    let err = service.register(&request).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateName {
            kind: EntityKind::User,
            ..
        }
    ));
}

#[test]
fn handle_with_disallowed_characters_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let err = service
        .register(&RegisterUserRequest {
            handle: "ada lovelace".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn update_replaces_fields_and_missing_account_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let created = service
        .register(&RegisterUserRequest {
            handle: "grace".to_string(),
            first_name: "G.".to_string(),
            last_name: "Hopper".to_string(),
        })
        .unwrap();

    let updated = service
        .update(
            created.id,
            &UpdateUserRequest {
                handle: "grace_h".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            },
        )
        .unwrap();
    assert_eq!(updated.handle, "grace_h");

    let fetched = service.get(created.id).unwrap().unwrap();
    assert_eq!(fetched.handle, "grace_h");
    assert_eq!(fetched.first_name, "Grace");

    let err = service
        .update(
            Uuid::new_v4(),
            &UpdateUserRequest {
                handle: "nobody".to_string(),
                first_name: String::new(),
                last_name: String::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::User,
            ..
        }
    ));
}

#[test]
fn list_users_orders_by_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let first = repo.create_user(&User::new("first")).unwrap();
    let second = repo.create_user(&User::new("second")).unwrap();

    // Same-millisecond inserts tie on created_at; pin distinct values.
    conn.execute(
        "UPDATE users SET created_at = 1000 WHERE id = ?1;",
        [first.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE users SET created_at = 2000 WHERE id = ?1;",
        [second.to_string()],
    )
    .unwrap();

    let listed = repo.list_users().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first);
    assert_eq!(listed[1].id, second);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("users"))
    ));
}
