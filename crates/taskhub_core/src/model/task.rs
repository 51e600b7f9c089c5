//! Task model and its joined read model.

use crate::model::label::{Label, LabelId};
use crate::model::status::StatusId;
use crate::model::user::UserId;
use crate::model::{EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable unique identifier of a task.
pub type TaskId = Uuid;

/// One unit of work.
///
/// The author is fixed at creation and never changes afterwards; the
/// executor is optional and reassignable. `label_ids` is the full set of
/// attached labels, replaced as a whole on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub author_id: UserId,
    pub executor_id: Option<UserId>,
    pub label_ids: Vec<LabelId>,
}

impl Task {
    /// Creates a task with a fresh random id and no executor or labels.
    pub fn new(name: impl Into<String>, status_id: StatusId, author_id: UserId) -> Self {
        Self::with_id(Uuid::new_v4(), name, status_id, author_id)
    }

    /// Creates a task with the given id.
    pub fn with_id(
        id: TaskId,
        name: impl Into<String>,
        status_id: StatusId,
        author_id: UserId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            status_id,
            author_id,
            executor_id: None,
            label_ids: Vec::new(),
        }
    }

    /// Validates field-level rules.
    ///
    /// # Errors
    /// - `EmptyField` when the name is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyField {
                kind: EntityKind::Task,
                field: "name",
            });
        }
        Ok(())
    }
}

/// Read model for task lists and detail pages.
///
/// Joins the display names of the referenced status and users so callers
/// render rows without further lookups. `author_name` and
/// `executor_name` follow the handle-fallback rule of
/// [`crate::model::user::display_name`]. `labels` is sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub status_name: String,
    pub author_id: UserId,
    pub author_handle: String,
    pub author_name: String,
    pub executor_id: Option<UserId>,
    pub executor_handle: Option<String>,
    pub executor_name: Option<String>,
    pub labels: Vec<Label>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::model::ModelValidationError;
    use uuid::Uuid;

    #[test]
    fn new_task_has_no_executor_or_labels() {
        let task = Task::new("Fix leak", Uuid::new_v4(), Uuid::new_v4());
        assert!(task.executor_id.is_none());
        assert!(task.label_ids.is_empty());
        assert!(task.description.is_empty());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let task = Task::new("  ", Uuid::new_v4(), Uuid::new_v4());
        let err = task.validate().expect_err("blank name");
        assert!(matches!(err, ModelValidationError::EmptyField { .. }));
    }

    #[test]
    fn task_serializes_with_snake_case_fields() {
        let task = Task::new("Fix leak", Uuid::new_v4(), Uuid::new_v4());
        let json = serde_json::to_value(&task).expect("task should serialize");
        assert!(json.get("status_id").is_some());
        assert!(json.get("author_id").is_some());
        assert!(json.get("executor_id").is_some());
    }
}
