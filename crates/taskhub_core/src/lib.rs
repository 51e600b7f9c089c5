//! Core domain logic for TaskHub.
//! This crate is the single source of truth for access-control and
//! referential-protection invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::gate::{
    guard, guard_delete, Decision, GatePages, LABELS_PAGE, LOGIN_PAGE, STATUSES_PAGE, TASKS_PAGE,
    USERS_PAGE,
};
pub use auth::policy::{
    authorize, Rule, TargetOwner, Verdict, MSG_LOGIN_REQUIRED, MSG_NOT_AUTHOR, MSG_NOT_OWNER,
};
pub use auth::principal::Principal;
pub use auth::protect::{
    delete_protected, in_use_message, ProtectedDeleteOutcome, MSG_LABEL_IN_USE, MSG_STATUS_IN_USE,
    MSG_TASK_IN_USE, MSG_USER_IN_USE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::label::{Label, LabelId};
pub use model::status::{Status, StatusId};
pub use model::task::{Task, TaskId, TaskRecord};
pub use model::user::{User, UserId};
pub use model::{EntityKind, ModelValidationError};
pub use repo::label_repo::{LabelRepository, SqliteLabelRepository};
pub use repo::status_repo::{SqliteStatusRepository, StatusRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskChanges, TaskFilter, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{DeleteOutcome, ProtectedDelete, RepoError, RepoResult};
pub use service::label_service::LabelService;
pub use service::status_service::StatusService;
pub use service::task_service::{CreateTaskRequest, TaskService};
pub use service::user_service::{RegisterUserRequest, UpdateUserRequest, UserService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
