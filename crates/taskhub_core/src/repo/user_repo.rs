//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide account persistence with a unique login handle.
//! - Expose the protected delete used when an account may still author
//!   or execute tasks.
//!
//! # Invariants
//! - Handles are unique; a clash surfaces as `DuplicateName`, never as a
//!   raw SQL error.
//! - Deleting a referenced user is blocked by the store, not by a prior
//!   relationship query.

use crate::model::user::{User, UserId};
use crate::model::EntityKind;
use crate::repo::{
    constraint_kind, delete_row_if_unreferenced, ensure_connection_ready, parse_uuid,
    ConstraintKind, DeleteOutcome, ProtectedDelete, RepoError, RepoResult, RequiredTable,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT
    id,
    handle,
    first_name,
    last_name
FROM users";

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "users",
    columns: &["id", "handle", "first_name", "last_name"],
}];

/// Repository interface for account CRUD operations.
pub trait UserRepository: ProtectedDelete {
    /// Creates one account and returns its stable id.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    /// Replaces handle and display names of an existing account.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Gets one account by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Gets one account by its unique handle.
    fn find_by_handle(&self, handle: &str) -> RepoResult<Option<User>>;
    /// Lists all accounts in creation order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
}

/// SQLite-backed account repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        let result = self.conn.execute(
            "INSERT INTO users (id, handle, first_name, last_name)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                user.handle.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(user.id),
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                Err(RepoError::DuplicateName {
                    kind: EntityKind::User,
                    name: user.handle.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let result = self.conn.execute(
            "UPDATE users
             SET
                handle = ?1,
                first_name = ?2,
                last_name = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                user.handle.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.id.to_string(),
            ],
        );

        let changed = match result {
            Ok(changed) => changed,
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                return Err(RepoError::DuplicateName {
                    kind: EntityKind::User,
                    name: user.handle.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::User,
                id: user.id,
            });
        }

        Ok(())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn find_by_handle(&self, handle: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE handle = ?1;"))?;
        let mut rows = stmt.query([handle])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

impl ProtectedDelete for SqliteUserRepository<'_> {
    const KIND: EntityKind = EntityKind::User;

    fn delete_if_unreferenced(&self, id: Uuid) -> RepoResult<DeleteOutcome> {
        delete_row_if_unreferenced(self.conn, "users", id)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let user = User {
        id: parse_uuid(&id_text, "users.id")?,
        handle: row.get("handle")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    };
    user.validate()?;
    Ok(user)
}
