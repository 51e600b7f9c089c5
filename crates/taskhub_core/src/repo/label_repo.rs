//! Label repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the label catalog with unique names.
//! - Expose the protected delete used when a label may still be attached
//!   to tasks through the link table.
//!
//! # Invariants
//! - Label names are unique; a clash surfaces as `DuplicateName`.
//! - Deleting an attached label is blocked by the store, not by a prior
//!   relationship query.

use crate::model::label::{Label, LabelId};
use crate::model::EntityKind;
use crate::repo::{
    constraint_kind, delete_row_if_unreferenced, ensure_connection_ready, parse_uuid,
    ConstraintKind, DeleteOutcome, ProtectedDelete, RepoError, RepoResult, RequiredTable,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const LABEL_SELECT_SQL: &str = "SELECT id, name FROM labels";

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "labels",
    columns: &["id", "name"],
}];

/// Repository interface for label catalog operations.
pub trait LabelRepository: ProtectedDelete {
    /// Creates one label and returns its stable id.
    fn create_label(&self, label: &Label) -> RepoResult<LabelId>;
    /// Renames an existing label.
    fn update_label(&self, label: &Label) -> RepoResult<()>;
    /// Gets one label by id.
    fn get_label(&self, id: LabelId) -> RepoResult<Option<Label>>;
    /// Lists all labels in creation order.
    fn list_labels(&self) -> RepoResult<Vec<Label>>;
}

/// SQLite-backed label repository.
pub struct SqliteLabelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLabelRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl LabelRepository for SqliteLabelRepository<'_> {
    fn create_label(&self, label: &Label) -> RepoResult<LabelId> {
        label.validate()?;

        let result = self.conn.execute(
            "INSERT INTO labels (id, name) VALUES (?1, ?2);",
            params![label.id.to_string(), label.name.as_str()],
        );

        match result {
            Ok(_) => Ok(label.id),
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                Err(RepoError::DuplicateName {
                    kind: EntityKind::Label,
                    name: label.name.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_label(&self, label: &Label) -> RepoResult<()> {
        label.validate()?;

        let result = self.conn.execute(
            "UPDATE labels
             SET name = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![label.name.as_str(), label.id.to_string()],
        );

        let changed = match result {
            Ok(changed) => changed,
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                return Err(RepoError::DuplicateName {
                    kind: EntityKind::Label,
                    name: label.name.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Label,
                id: label.id,
            });
        }

        Ok(())
    }

    fn get_label(&self, id: LabelId) -> RepoResult<Option<Label>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LABEL_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_label_row(row)?));
        }
        Ok(None)
    }

    fn list_labels(&self) -> RepoResult<Vec<Label>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LABEL_SELECT_SQL} ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut labels = Vec::new();
        while let Some(row) = rows.next()? {
            labels.push(parse_label_row(row)?);
        }
        Ok(labels)
    }
}

impl ProtectedDelete for SqliteLabelRepository<'_> {
    const KIND: EntityKind = EntityKind::Label;

    fn delete_if_unreferenced(&self, id: Uuid) -> RepoResult<DeleteOutcome> {
        delete_row_if_unreferenced(self.conn, "labels", id)
    }
}

fn parse_label_row(row: &Row<'_>) -> RepoResult<Label> {
    let id_text: String = row.get("id")?;
    let label = Label {
        id: parse_uuid(&id_text, "labels.id")?,
        name: row.get("name")?,
    };
    label.validate()?;
    Ok(label)
}
