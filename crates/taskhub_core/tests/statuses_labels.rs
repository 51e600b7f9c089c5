use taskhub_core::db::open_db_in_memory;
use taskhub_core::{
    EntityKind, LabelService, RepoError, SqliteLabelRepository, SqliteStatusRepository,
    StatusService,
};
use uuid::Uuid;

#[test]
fn status_create_update_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = StatusService::new(SqliteStatusRepository::try_new(&conn).unwrap());

    let created = service.create("New").unwrap();
    let fetched = service.get(created.id).unwrap().unwrap();
    assert_eq!(fetched.name, "New");

    let renamed = service.update(created.id, "In progress").unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(service.get(created.id).unwrap().unwrap().name, "In progress");
}

#[test]
fn status_names_are_unique() {
    let conn = open_db_in_memory().unwrap();
    let service = StatusService::new(SqliteStatusRepository::try_new(&conn).unwrap());

    service.create("New").unwrap();
    let err = service.create("New").unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateName {
            kind: EntityKind::Status,
            ..
        }
    ));
}

#[test]
fn blank_status_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = StatusService::new(SqliteStatusRepository::try_new(&conn).unwrap());

    let err = service.create("   ").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn renaming_missing_status_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = StatusService::new(SqliteStatusRepository::try_new(&conn).unwrap());

    let err = service.update(Uuid::new_v4(), "Ghost").unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Status,
            ..
        }
    ));
}

#[test]
fn status_list_orders_by_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let service = StatusService::new(SqliteStatusRepository::try_new(&conn).unwrap());

    let new = service.create("New").unwrap();
    let done = service.create("Completed").unwrap();

    conn.execute(
        "UPDATE statuses SET created_at = 1000 WHERE id = ?1;",
        [new.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE statuses SET created_at = 2000 WHERE id = ?1;",
        [done.id.to_string()],
    )
    .unwrap();

    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "New");
    assert_eq!(listed[1].name, "Completed");
}

#[test]
fn label_create_update_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = LabelService::new(SqliteLabelRepository::try_new(&conn).unwrap());

    let created = service.create("bug").unwrap();
    assert_eq!(service.get(created.id).unwrap().unwrap().name, "bug");

    service.update(created.id, "defect").unwrap();
    assert_eq!(service.get(created.id).unwrap().unwrap().name, "defect");
}

#[test]
fn label_names_are_unique_and_non_blank() {
    let conn = open_db_in_memory().unwrap();
    let service = LabelService::new(SqliteLabelRepository::try_new(&conn).unwrap());

    service.create("bug").unwrap();
    let err = service.create("bug").unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateName {
            kind: EntityKind::Label,
            ..
        }
    ));

    let err = service.create("").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
