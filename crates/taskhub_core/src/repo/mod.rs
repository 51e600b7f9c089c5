//! Repository contracts and SQLite machinery shared by all resources.
//!
//! # Responsibility
//! - Define the shared repository error taxonomy and result alias.
//! - Classify SQLite constraint failures into typed domain errors.
//! - Provide the single-statement protected delete every resource uses.
//! - Validate connection readiness before handing out repositories.
//!
//! # Invariants
//! - `delete_row_if_unreferenced` issues exactly one `DELETE`; no
//!   relationship queries run before or after it. The statement outcome
//!   is the only arbiter of whether a row was still referenced.
//! - Write paths call model `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//!
//! # See also
//! - `crate::auth::protect` for the coordinator mapping delete outcomes
//!   to user-facing reasons.

pub mod label_repo;
pub mod status_repo;
pub mod task_repo;
pub mod user_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::{EntityKind, ModelValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    /// No row of this kind has the given id.
    NotFound { kind: EntityKind, id: Uuid },
    /// A unique name (or handle) is already taken.
    DuplicateName { kind: EntityKind, name: String },
    /// A write referenced a related row that does not exist.
    ReferenceMissing { kind: EntityKind },
    /// Persisted data cannot be converted to a valid model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DuplicateName { kind, name } => {
                write!(f, "{kind} name `{name}` is already taken")
            }
            Self::ReferenceMissing { kind } => {
                write!(f, "{kind} write references a row that does not exist")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of one atomic delete attempt against a protected table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row existed and is gone.
    Deleted,
    /// The row is still referenced and was left untouched.
    Blocked,
    /// No row had the given id.
    NotFound,
}

/// Delete capability every resource repository exposes to the
/// protected-deletion coordinator.
pub trait ProtectedDelete {
    /// Resource family this repository persists.
    const KIND: EntityKind;

    /// Attempts to delete one row as a single indivisible statement.
    ///
    /// Implementations must not query relationships before or after the
    /// delete; the statement itself reports whether the row was still
    /// referenced. Two concurrent calls for the same id resolve to one
    /// `Deleted` and one `NotFound`, never a double delete.
    fn delete_if_unreferenced(&self, id: Uuid) -> RepoResult<DeleteOutcome>;
}

/// Constraint families the repositories translate into typed errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Classifies a SQLite failure by its extended result code.
pub(crate) fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    let rusqlite::Error::SqliteFailure(code, _) = err else {
        return None;
    };
    match code.extended_code {
        rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Some(ConstraintKind::Unique)
        }
        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER => {
            Some(ConstraintKind::ForeignKey)
        }
        _ => None,
    }
}

/// Deletes one row and reports the typed outcome.
///
/// The `DELETE` is the sole arbiter: zero affected rows means the row was
/// already gone, a foreign-key failure means a live reference blocked the
/// delete and nothing changed. Any other failure propagates.
pub(crate) fn delete_row_if_unreferenced(
    conn: &Connection,
    table: &'static str,
    id: Uuid,
) -> RepoResult<DeleteOutcome> {
    let result = conn.execute(
        &format!("DELETE FROM {table} WHERE id = ?1;"),
        [id.to_string()],
    );
    match result {
        Ok(0) => Ok(DeleteOutcome::NotFound),
        Ok(_) => Ok(DeleteOutcome::Deleted),
        Err(err) => match constraint_kind(&err) {
            Some(ConstraintKind::ForeignKey) => Ok(DeleteOutcome::Blocked),
            _ => Err(err.into()),
        },
    }
}

/// One table a repository needs, with the columns it reads or writes.
pub(crate) struct RequiredTable {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Validates that `conn` is migrated and carries the tables/columns a
/// repository depends on.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required: &[RequiredTable],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in required {
        if !table_exists(conn, table.name)? {
            return Err(RepoError::MissingRequiredTable(table.name));
        }
        for column in table.columns {
            if !table_has_column(conn, table.name, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: table.name,
                    column,
                });
            }
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::parse_uuid;
    use crate::repo::RepoError;

    #[test]
    fn parse_uuid_reports_offending_column() {
        let err = parse_uuid("not-a-uuid", "tasks.id").expect_err("must fail");
        match err {
            RepoError::InvalidData(message) => {
                assert!(message.contains("tasks.id"));
                assert!(message.contains("not-a-uuid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
