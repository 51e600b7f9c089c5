//! Task label model.

use crate::model::{EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable unique identifier of a label.
pub type LabelId = Uuid;

/// One free-form tag attachable to any number of tasks.
///
/// The name is unique across the store; labels still attached to tasks
/// are delete-protected at the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
}

impl Label {
    /// Creates a label with a fresh random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a label with the given id.
    pub fn with_id(id: LabelId, name: impl Into<String>) -> Self {
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
                kind: EntityKind::Label,
                field: "name",
            });
        }
        Ok(())
    }
}
