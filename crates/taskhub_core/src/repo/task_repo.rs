//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist tasks together with their label links.
//! - Serve the joined read model for list/detail use-cases.
//!
//! # Invariants
//! - `author_id` is written once at creation and never updated.
//! - Label links are replaced as a whole set inside one immediate
//!   transaction; a task row and its links never diverge.
//! - Writes referencing missing statuses, users or labels surface as
//!   `ReferenceMissing`, never as raw SQL errors.

use crate::model::label::{Label, LabelId};
use crate::model::status::StatusId;
use crate::model::task::{Task, TaskId, TaskRecord};
use crate::model::user::{display_name, UserId};
use crate::model::{EntityKind, ModelValidationError};
use crate::repo::{
    constraint_kind, delete_row_if_unreferenced, ensure_connection_ready, parse_uuid,
    ConstraintKind, DeleteOutcome, ProtectedDelete, RepoError, RepoResult, RequiredTable,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

const TASK_RECORD_SELECT_SQL: &str = "SELECT
    t.id,
    t.name,
    t.description,
    t.status_id,
    s.name AS status_name,
    t.author_id,
    au.handle AS author_handle,
    au.first_name AS author_first_name,
    au.last_name AS author_last_name,
    t.executor_id,
    ex.handle AS executor_handle,
    ex.first_name AS executor_first_name,
    ex.last_name AS executor_last_name,
    t.created_at
FROM tasks t
INNER JOIN statuses s ON s.id = t.status_id
INNER JOIN users au ON au.id = t.author_id
LEFT JOIN users ex ON ex.id = t.executor_id";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "tasks",
        columns: &[
            "id",
            "name",
            "description",
            "status_id",
            "author_id",
            "executor_id",
        ],
    },
    RequiredTable {
        name: "task_labels",
        columns: &["task_id", "label_id"],
    },
];

/// Mutable task fields for update operations.
///
/// The author is deliberately absent: it is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub executor_id: Option<UserId>,
    pub label_ids: Vec<LabelId>,
}

/// Conjunctive filter options for task list use-cases.
///
/// Every set field narrows the result; unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status_id: Option<StatusId>,
    pub executor_id: Option<UserId>,
    pub label_id: Option<LabelId>,
    pub author_id: Option<UserId>,
}

/// Repository interface for task operations.
pub trait TaskRepository: ProtectedDelete {
    /// Creates one task with its label links and returns its stable id.
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId>;
    /// Replaces the mutable fields and the whole label set of a task.
    fn update_task(&mut self, id: TaskId, changes: &TaskChanges) -> RepoResult<()>;
    /// Gets one task write model by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Gets one joined task record by id.
    fn get_task_record(&self, id: TaskId) -> RepoResult<Option<TaskRecord>>;
    /// Lists joined task records matching the filter, oldest first.
    fn list_tasks(&self, filter: &TaskFilter) -> RepoResult<Vec<TaskRecord>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let inserted = tx.execute(
            "INSERT INTO tasks (id, name, description, status_id, author_id, executor_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.id.to_string(),
                task.name.as_str(),
                task.description.as_str(),
                task.status_id.to_string(),
                task.author_id.to_string(),
                task.executor_id.map(|id| id.to_string()),
            ],
        );
        if let Err(err) = inserted {
            return Err(map_task_write_error(err));
        }

        replace_label_links(&tx, task.id, &task.label_ids)?;
        tx.commit()?;
        Ok(task.id)
    }

    fn update_task(&mut self, id: TaskId, changes: &TaskChanges) -> RepoResult<()> {
        validate_task_name(&changes.name)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = tx.execute(
            "UPDATE tasks
             SET
                name = ?1,
                description = ?2,
                status_id = ?3,
                executor_id = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                changes.name.as_str(),
                changes.description.as_str(),
                changes.status_id.to_string(),
                changes.executor_id.map(|executor| executor.to_string()),
                id.to_string(),
            ],
        );

        let changed = match result {
            Ok(changed) => changed,
            Err(err) => return Err(map_task_write_error(err)),
        };
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }

        replace_label_links(&tx, id, &changes.label_ids)?;
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, status_id, author_id, executor_id
             FROM tasks
             WHERE id = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let label_ids = load_label_ids(self.conn, &id_text)?;
            let executor_text: Option<String> = row.get("executor_id")?;
            let status_text: String = row.get("status_id")?;
            let author_text: String = row.get("author_id")?;
            return Ok(Some(Task {
                id: parse_uuid(&id_text, "tasks.id")?,
                name: row.get("name")?,
                description: row.get("description")?,
                status_id: parse_uuid(&status_text, "tasks.status_id")?,
                author_id: parse_uuid(&author_text, "tasks.author_id")?,
                executor_id: match executor_text {
                    Some(value) => Some(parse_uuid(&value, "tasks.executor_id")?),
                    None => None,
                },
                label_ids,
            }));
        }

        Ok(None)
    }

    fn get_task_record(&self, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_RECORD_SELECT_SQL} WHERE t.id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let labels = load_labels_for_task(self.conn, &id_text)?;
            return Ok(Some(parse_task_record_row(row, labels)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, filter: &TaskFilter) -> RepoResult<Vec<TaskRecord>> {
        let mut sql = format!("{TASK_RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status_id) = filter.status_id {
            sql.push_str(" AND t.status_id = ?");
            bind_values.push(Value::Text(status_id.to_string()));
        }
        if let Some(executor_id) = filter.executor_id {
            sql.push_str(" AND t.executor_id = ?");
            bind_values.push(Value::Text(executor_id.to_string()));
        }
        if let Some(author_id) = filter.author_id {
            sql.push_str(" AND t.author_id = ?");
            bind_values.push(Value::Text(author_id.to_string()));
        }
        if let Some(label_id) = filter.label_id {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM task_labels tl
                    WHERE tl.task_id = t.id
                      AND tl.label_id = ?
                )",
            );
            bind_values.push(Value::Text(label_id.to_string()));
        }

        sql.push_str(" ORDER BY t.created_at ASC, t.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let labels = load_labels_for_task(self.conn, &id_text)?;
            records.push(parse_task_record_row(row, labels)?);
        }

        Ok(records)
    }
}

impl ProtectedDelete for SqliteTaskRepository<'_> {
    const KIND: EntityKind = EntityKind::Task;

    fn delete_if_unreferenced(&self, id: Uuid) -> RepoResult<DeleteOutcome> {
        // Label links go with the task via ON DELETE CASCADE; nothing
        // else references tasks, so this delete cannot block today.
        delete_row_if_unreferenced(self.conn, "tasks", id)
    }
}

fn validate_task_name(name: &str) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation(ModelValidationError::EmptyField {
            kind: EntityKind::Task,
            field: "name",
        }));
    }
    Ok(())
}

fn map_task_write_error(err: rusqlite::Error) -> RepoError {
    match constraint_kind(&err) {
        Some(ConstraintKind::ForeignKey) => RepoError::ReferenceMissing {
            kind: EntityKind::Task,
        },
        _ => err.into(),
    }
}

/// Replaces the whole label set of one task inside the caller's
/// transaction. Duplicate ids collapse to one link.
fn replace_label_links(
    tx: &Transaction<'_>,
    task_id: TaskId,
    label_ids: &[LabelId],
) -> RepoResult<()> {
    let task_id_text = task_id.to_string();
    tx.execute(
        "DELETE FROM task_labels WHERE task_id = ?1;",
        [task_id_text.as_str()],
    )?;

    let unique: BTreeSet<LabelId> = label_ids.iter().copied().collect();
    for label_id in unique {
        let linked = tx.execute(
            "INSERT INTO task_labels (task_id, label_id) VALUES (?1, ?2);",
            params![task_id_text.as_str(), label_id.to_string()],
        );
        if let Err(err) = linked {
            return Err(map_task_write_error(err));
        }
    }

    Ok(())
}

fn parse_task_record_row(row: &Row<'_>, labels: Vec<Label>) -> RepoResult<TaskRecord> {
    let id_text: String = row.get("id")?;
    let status_text: String = row.get("status_id")?;
    let author_text: String = row.get("author_id")?;
    let executor_text: Option<String> = row.get("executor_id")?;

    let author_handle: String = row.get("author_handle")?;
    let author_first: String = row.get("author_first_name")?;
    let author_last: String = row.get("author_last_name")?;
    let author_name = display_name(&author_first, &author_last, &author_handle);

    let executor_handle: Option<String> = row.get("executor_handle")?;
    let executor_first: Option<String> = row.get("executor_first_name")?;
    let executor_last: Option<String> = row.get("executor_last_name")?;
    let executor_name = executor_handle.as_deref().map(|handle| {
        display_name(
            executor_first.as_deref().unwrap_or_default(),
            executor_last.as_deref().unwrap_or_default(),
            handle,
        )
    });

    Ok(TaskRecord {
        id: parse_uuid(&id_text, "tasks.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        status_id: parse_uuid(&status_text, "tasks.status_id")?,
        status_name: row.get("status_name")?,
        author_id: parse_uuid(&author_text, "tasks.author_id")?,
        author_handle,
        author_name,
        executor_id: match executor_text {
            Some(value) => Some(parse_uuid(&value, "tasks.executor_id")?),
            None => None,
        },
        executor_handle,
        executor_name,
        labels,
        created_at: row.get("created_at")?,
    })
}

fn load_label_ids(conn: &Connection, task_id: &str) -> RepoResult<Vec<LabelId>> {
    let mut stmt = conn.prepare(
        "SELECT label_id
         FROM task_labels
         WHERE task_id = ?1
         ORDER BY label_id ASC;",
    )?;
    let mut rows = stmt.query([task_id])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "task_labels.label_id")?);
    }
    Ok(ids)
}

fn load_labels_for_task(conn: &Connection, task_id: &str) -> RepoResult<Vec<Label>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.name
         FROM task_labels tl
         INNER JOIN labels l ON l.id = tl.label_id
         WHERE tl.task_id = ?1
         ORDER BY l.name COLLATE NOCASE ASC, l.id ASC;",
    )?;
    let mut rows = stmt.query([task_id])?;
    let mut labels = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        labels.push(Label {
            id: parse_uuid(&id_text, "labels.id")?,
            name: row.get("name")?,
        });
    }
    Ok(labels)
}
