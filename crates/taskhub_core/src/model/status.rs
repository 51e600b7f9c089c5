//! Task status model.

use crate::model::{EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable unique identifier of a status.
pub type StatusId = Uuid;

/// One workflow state a task can be in, e.g. "New" or "Completed".
///
/// The name is unique across the store; statuses referenced by tasks
/// are delete-protected at the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub name: String,
}

impl Status {
    /// Creates a status with a fresh random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a status with the given id.
    pub fn with_id(id: StatusId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Validates field-level rules.
    ///
    /// # Errors
    /// - `EmptyField` when the name is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyField {
                kind: EntityKind::Status,
                field: "name",
            });
        }
        Ok(())
    }
}
