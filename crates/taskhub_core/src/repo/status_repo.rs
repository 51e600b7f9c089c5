//! Status repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the workflow status catalog with unique names.
//! - Expose the protected delete used when a status may still be
//!   assigned to tasks.
//!
//! # Invariants
//! - Status names are unique; a clash surfaces as `DuplicateName`.
//! - Deleting an assigned status is blocked by the store, not by a prior
//!   relationship query.

use crate::model::status::{Status, StatusId};
use crate::model::EntityKind;
use crate::repo::{
    constraint_kind, delete_row_if_unreferenced, ensure_connection_ready, parse_uuid,
    ConstraintKind, DeleteOutcome, ProtectedDelete, RepoError, RepoResult, RequiredTable,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const STATUS_SELECT_SQL: &str = "SELECT id, name FROM statuses";

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "statuses",
    columns: &["id", "name"],
}];

/// Repository interface for status catalog operations.
pub trait StatusRepository: ProtectedDelete {
    /// Creates one status and returns its stable id.
    fn create_status(&self, status: &Status) -> RepoResult<StatusId>;
    /// Renames an existing status.
    fn update_status(&self, status: &Status) -> RepoResult<()>;
    /// Gets one status by id.
    fn get_status(&self, id: StatusId) -> RepoResult<Option<Status>>;
    /// Lists all statuses in creation order.
    fn list_statuses(&self) -> RepoResult<Vec<Status>>;
}

/// SQLite-backed status repository.
pub struct SqliteStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatusRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl StatusRepository for SqliteStatusRepository<'_> {
    fn create_status(&self, status: &Status) -> RepoResult<StatusId> {
        status.validate()?;

        let result = self.conn.execute(
            "INSERT INTO statuses (id, name) VALUES (?1, ?2);",
            params![status.id.to_string(), status.name.as_str()],
        );

        match result {
            Ok(_) => Ok(status.id),
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                Err(RepoError::DuplicateName {
                    kind: EntityKind::Status,
                    name: status.name.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_status(&self, status: &Status) -> RepoResult<()> {
        status.validate()?;

        let result = self.conn.execute(
            "UPDATE statuses
             SET name = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![status.name.as_str(), status.id.to_string()],
        );

        let changed = match result {
            Ok(changed) => changed,
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                return Err(RepoError::DuplicateName {
                    kind: EntityKind::Status,
                    name: status.name.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Status,
                id: status.id,
            });
        }

        Ok(())
    }

    fn get_status(&self, id: StatusId) -> RepoResult<Option<Status>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STATUS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_status_row(row)?));
        }
        Ok(None)
    }

    fn list_statuses(&self) -> RepoResult<Vec<Status>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STATUS_SELECT_SQL} ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut statuses = Vec::new();
        while let Some(row) = rows.next()? {
            statuses.push(parse_status_row(row)?);
        }
        Ok(statuses)
    }
}

impl ProtectedDelete for SqliteStatusRepository<'_> {
    const KIND: EntityKind = EntityKind::Status;

    fn delete_if_unreferenced(&self, id: Uuid) -> RepoResult<DeleteOutcome> {
        delete_row_if_unreferenced(self.conn, "statuses", id)
    }
}

fn parse_status_row(row: &Row<'_>) -> RepoResult<Status> {
    let id_text: String = row.get("id")?;
    let status = Status {
        id: parse_uuid(&id_text, "statuses.id")?,
        name: row.get("name")?,
    };
    status.validate()?;
    Ok(status)
}
