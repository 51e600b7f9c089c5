//! Domain model for the task tracker.
//!
//! # Responsibility
//! - Define the entities handlers and repositories exchange: users,
//!   statuses, labels, tasks.
//! - Validate field-level rules before anything reaches persistence.
//!
//! # Invariants
//! - Models are plain data; relationship rules (uniqueness, referential
//!   protection) are enforced by the repository layer.
//!
//! # See also
//! - `crate::repo` for persistence and referential protection.
//! - `crate::auth` for the rules deciding who may touch which entity.

pub mod label;
pub mod status;
pub mod task;
pub mod user;

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Resource families known to the policy and persistence layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Status,
    Label,
    Task,
}

impl EntityKind {
    /// Returns the stable lowercase name used in logs and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Status => "status",
            EntityKind::Label => "label",
            EntityKind::Task => "task",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField {
        kind: EntityKind,
        field: &'static str,
    },
    /// A user handle contains characters outside the allowed set.
    InvalidHandle { handle: String },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ModelValidationError::EmptyField { kind, field } => {
                write!(f, "{kind} field `{field}` must not be empty")
            }
            ModelValidationError::InvalidHandle { handle } => {
                write!(
                    f,
                    "invalid handle `{handle}`: only letters, digits and @/./+/-/_ are allowed"
                )
            }
        }
    }
}

impl Error for ModelValidationError {}

#[cfg(test)]
mod tests {
    use super::EntityKind;

    #[test]
    fn entity_kind_names_are_stable() {
        assert_eq!(EntityKind::User.as_str(), "user");
        assert_eq!(EntityKind::Status.as_str(), "status");
        assert_eq!(EntityKind::Label.as_str(), "label");
        assert_eq!(EntityKind::Task.as_str(), "task");
    }

    #[test]
    fn entity_kind_display_matches_as_str() {
        assert_eq!(format!("{}", EntityKind::Task), "task");
    }
}
