use rusqlite::Connection;
use taskhub_core::db::open_db_in_memory;
use taskhub_core::{
    EntityKind, Label, LabelId, LabelRepository, RepoError, SqliteLabelRepository,
    SqliteStatusRepository, SqliteTaskRepository, SqliteUserRepository, Status, StatusId,
    StatusRepository, Task, TaskChanges, TaskFilter, TaskRepository, User, UserId, UserRepository,
};
use uuid::Uuid;

fn seed_user(conn: &Connection, handle: &str) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new(handle)).unwrap()
}

fn seed_status(conn: &Connection, name: &str) -> StatusId {
    let repo = SqliteStatusRepository::try_new(conn).unwrap();
    repo.create_status(&Status::new(name)).unwrap()
}

fn seed_label(conn: &Connection, name: &str) -> LabelId {
    let repo = SqliteLabelRepository::try_new(conn).unwrap();
    repo.create_label(&Label::new(name)).unwrap()
}

#[test]
fn created_task_record_joins_display_names() {
    let mut conn = open_db_in_memory().unwrap();
    let author = {
        let repo = SqliteUserRepository::try_new(&conn).unwrap();
        let mut user = User::new("author");
        user.first_name = "Ada".to_string();
        user.last_name = "Lovelace".to_string();
        repo.create_user(&user).unwrap()
    };
    let executor = seed_user(&conn, "worker");
    let status = seed_status(&conn, "New");
    let label_ui = seed_label(&conn, "ui");
    let label_bug = seed_label(&conn, "bug");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let mut task = Task::new("Fix layout", status, author);
    task.description = "Sidebar overlaps content".to_string();
    task.executor_id = Some(executor);
    task.label_ids = vec![label_ui, label_bug];
    repo.create_task(&task).unwrap();

    let record = repo.get_task_record(task.id).unwrap().unwrap();
    assert_eq!(record.name, "Fix layout");
    assert_eq!(record.status_name, "New");
    assert_eq!(record.author_handle, "author");
    assert_eq!(record.author_name, "Ada Lovelace");
    assert_eq!(record.executor_handle.as_deref(), Some("worker"));
    // Blank names fall back to the handle.
    assert_eq!(record.executor_name.as_deref(), Some("worker"));
    assert!(record.created_at > 0);

    // Labels come back sorted by name.
    let label_names: Vec<&str> = record.labels.iter().map(|label| label.name.as_str()).collect();
    assert_eq!(label_names, vec!["bug", "ui"]);
}

#[test]
fn task_without_executor_reads_back_with_none() {
    let mut conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let status = seed_status(&conn, "New");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let task = Task::new("Unassigned", status, author);
    repo.create_task(&task).unwrap();

    let record = repo.get_task_record(task.id).unwrap().unwrap();
    assert_eq!(record.executor_id, None);
    assert_eq!(record.executor_handle, None);
    assert_eq!(record.executor_name, None);
}

#[test]
fn creating_task_with_missing_status_fails() {
    let mut conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let task = Task::new("Orphan", Uuid::new_v4(), author);
    let err = repo.create_task(&task).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferenceMissing {
            kind: EntityKind::Task
        }
    ));
}

#[test]
fn failed_label_link_rolls_back_the_whole_create() {
    let mut conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let status = seed_status(&conn, "New");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let mut task = Task::new("Half done", status, author);
    task.label_ids = vec![Uuid::new_v4()];

    let err = repo.create_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::ReferenceMissing { .. }));

    // The task row must not survive the failed link insert.
    assert!(repo.get_task(task.id).unwrap().is_none());
}

#[test]
fn duplicate_label_ids_collapse_to_one_link() {
    let mut conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let status = seed_status(&conn, "New");
    let label = seed_label(&conn, "bug");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let mut task = Task::new("Deduped", status, author);
    task.label_ids = vec![label, label];
    repo.create_task(&task).unwrap();

    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.label_ids, vec![label]);
}

#[test]
fn update_replaces_labels_and_never_touches_author() {
    let mut conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let other = seed_user(&conn, "other");
    let status = seed_status(&conn, "New");
    let done = seed_status(&conn, "Completed");
    let label_old = seed_label(&conn, "old");
    let label_new = seed_label(&conn, "new");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let mut task = Task::new("Shifting", status, author);
    task.label_ids = vec![label_old];
    repo.create_task(&task).unwrap();

    repo.update_task(
        task.id,
        &TaskChanges {
            name: "Shifted".to_string(),
            description: "moved along".to_string(),
            status_id: done,
            executor_id: Some(other),
            label_ids: vec![label_new],
        },
    )
    .unwrap();

    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.name, "Shifted");
    assert_eq!(stored.status_id, done);
    assert_eq!(stored.executor_id, Some(other));
    assert_eq!(stored.label_ids, vec![label_new]);
    assert_eq!(stored.author_id, author);
}

#[test]
fn updating_missing_task_reports_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let status = seed_status(&conn, "New");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let err = repo
        .update_task(
            Uuid::new_v4(),
            &TaskChanges {
                name: "Ghost".to_string(),
                description: String::new(),
                status_id: status,
                executor_id: None,
                label_ids: Vec::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Task,
            ..
        }
    ));
}

#[test]
fn list_filters_by_status_executor_label_and_author() {
    let mut conn = open_db_in_memory().unwrap();
    let author_a = seed_user(&conn, "alice");
    let author_b = seed_user(&conn, "bob");
    let status_new = seed_status(&conn, "New");
    let status_done = seed_status(&conn, "Completed");
    let label_bug = seed_label(&conn, "bug");

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let mut first = Task::new("First", status_new, author_a);
    first.executor_id = Some(author_b);
    first.label_ids = vec![label_bug];
    repo.create_task(&first).unwrap();

    let mut second = Task::new("Second", status_done, author_b);
    second.executor_id = Some(author_a);
    repo.create_task(&second).unwrap();

    let third = Task::new("Third", status_new, author_b);
    repo.create_task(&third).unwrap();

    let by_status = repo
        .list_tasks(&TaskFilter {
            status_id: Some(status_new),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(by_status.len(), 2);

    let by_executor = repo
        .list_tasks(&TaskFilter {
            executor_id: Some(author_b),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(by_executor.len(), 1);
    assert_eq!(by_executor[0].name, "First");

    let by_label = repo
        .list_tasks(&TaskFilter {
            label_id: Some(label_bug),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(by_label.len(), 1);
    assert_eq!(by_label[0].name, "First");

    // "Only my tasks" is an author filter.
    let own = repo
        .list_tasks(&TaskFilter {
            author_id: Some(author_b),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(own.len(), 2);

    let combined = repo
        .list_tasks(&TaskFilter {
            status_id: Some(status_new),
            author_id: Some(author_b),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].name, "Third");

    let unfiltered = repo.list_tasks(&TaskFilter::default()).unwrap();
    assert_eq!(unfiltered.len(), 3);
}

#[test]
fn list_orders_tasks_oldest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let status = seed_status(&conn, "New");

    let (early_id, late_id) = {
        let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
        let early = Task::new("Early", status, author);
        repo.create_task(&early).unwrap();
        let late = Task::new("Late", status, author);
        repo.create_task(&late).unwrap();
        (early.id, late.id)
    };

    // Same-millisecond inserts tie on created_at; pin distinct values.
    conn.execute(
        "UPDATE tasks SET created_at = 1000 WHERE id = ?1;",
        [early_id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE tasks SET created_at = 2000 WHERE id = ?1;",
        [late_id.to_string()],
    )
    .unwrap();

    let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let listed = repo.list_tasks(&TaskFilter::default()).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Early");
    assert_eq!(listed[1].name, "Late");
}
