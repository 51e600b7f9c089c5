//! Protected deletion coordinator.
//!
//! # Responsibility
//! - Run one delete through a repository's atomic delete capability.
//! - Map a blocked outcome to the fixed, kind-specific reason shown to
//!   the user.
//!
//! # Invariants
//! - The repository's single statement decides; this module never
//!   queries relationships before or after it.
//! - `Blocked` always means the entity was left untouched.
//! - Store faults other than a referential conflict propagate unchanged.

use crate::model::EntityKind;
use crate::repo::{DeleteOutcome, ProtectedDelete, RepoResult};
use log::info;
use uuid::Uuid;

/// Fixed reason shown when a referenced user cannot be deleted.
pub const MSG_USER_IN_USE: &str = "Unable to delete user because it is in use";
/// Fixed reason shown when an assigned status cannot be deleted.
pub const MSG_STATUS_IN_USE: &str = "Unable to delete status because it is in use";
/// Fixed reason shown when an attached label cannot be deleted.
pub const MSG_LABEL_IN_USE: &str = "Can't delete label because it's in use";
/// Fixed reason shown when a referenced task cannot be deleted.
pub const MSG_TASK_IN_USE: &str = "Unable to delete task because it is in use";

/// Returns the fixed user-facing reason for a blocked delete of `kind`.
pub fn in_use_message(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::User => MSG_USER_IN_USE,
        EntityKind::Status => MSG_STATUS_IN_USE,
        EntityKind::Label => MSG_LABEL_IN_USE,
        EntityKind::Task => MSG_TASK_IN_USE,
    }
}

/// Outcome of one protected delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedDeleteOutcome {
    /// The entity existed and is gone.
    Deleted,
    /// The entity is still referenced and was left untouched.
    Blocked { reason: &'static str },
    /// The entity did not exist when the delete ran.
    NotFound,
}

/// Attempts one delete and attaches the kind-specific reason to a
/// referential block.
///
/// # Errors
/// - Propagates repository faults unchanged; an infrastructure failure
///   is not a policy outcome.
pub fn delete_protected<R: ProtectedDelete>(
    repo: &R,
    id: Uuid,
) -> RepoResult<ProtectedDeleteOutcome> {
    let outcome = match repo.delete_if_unreferenced(id)? {
        DeleteOutcome::Deleted => ProtectedDeleteOutcome::Deleted,
        DeleteOutcome::Blocked => ProtectedDeleteOutcome::Blocked {
            reason: in_use_message(R::KIND),
        },
        DeleteOutcome::NotFound => ProtectedDeleteOutcome::NotFound,
    };

    info!(
        "event=protected_delete module=auth status={} kind={} id={}",
        outcome_status(&outcome),
        R::KIND.as_str(),
        id
    );
    Ok(outcome)
}

fn outcome_status(outcome: &ProtectedDeleteOutcome) -> &'static str {
    match outcome {
        ProtectedDeleteOutcome::Deleted => "deleted",
        ProtectedDeleteOutcome::Blocked { .. } => "blocked",
        ProtectedDeleteOutcome::NotFound => "not_found",
    }
}

#[cfg(test)]
mod tests {
    use super::{delete_protected, in_use_message, ProtectedDeleteOutcome};
    use crate::model::EntityKind;
    use crate::repo::{DeleteOutcome, ProtectedDelete, RepoError, RepoResult};
    use uuid::Uuid;

    struct FixedOutcomeRepo {
        outcome: DeleteOutcome,
    }

    impl ProtectedDelete for FixedOutcomeRepo {
        const KIND: EntityKind = EntityKind::Status;

        fn delete_if_unreferenced(&self, _id: Uuid) -> RepoResult<DeleteOutcome> {
            Ok(self.outcome)
        }
    }

    struct FailingRepo;

    impl ProtectedDelete for FailingRepo {
        const KIND: EntityKind = EntityKind::Status;

        fn delete_if_unreferenced(&self, _id: Uuid) -> RepoResult<DeleteOutcome> {
            Err(RepoError::MissingRequiredTable("statuses"))
        }
    }

    #[test]
    fn every_kind_has_a_fixed_in_use_reason() {
        assert_eq!(
            in_use_message(EntityKind::User),
            "Unable to delete user because it is in use"
        );
        assert_eq!(
            in_use_message(EntityKind::Status),
            "Unable to delete status because it is in use"
        );
        assert_eq!(
            in_use_message(EntityKind::Label),
            "Can't delete label because it's in use"
        );
        assert_eq!(
            in_use_message(EntityKind::Task),
            "Unable to delete task because it is in use"
        );
    }

    #[test]
    fn blocked_outcome_carries_kind_specific_reason() {
        let repo = FixedOutcomeRepo {
            outcome: DeleteOutcome::Blocked,
        };
        let outcome = delete_protected(&repo, Uuid::new_v4()).expect("no repo fault");
        assert_eq!(
            outcome,
            ProtectedDeleteOutcome::Blocked {
                reason: in_use_message(EntityKind::Status)
            }
        );
    }

    #[test]
    fn deleted_and_missing_map_straight_through() {
        let deleted = FixedOutcomeRepo {
            outcome: DeleteOutcome::Deleted,
        };
        assert_eq!(
            delete_protected(&deleted, Uuid::new_v4()).expect("no repo fault"),
            ProtectedDeleteOutcome::Deleted
        );

        let missing = FixedOutcomeRepo {
            outcome: DeleteOutcome::NotFound,
        };
        assert_eq!(
            delete_protected(&missing, Uuid::new_v4()).expect("no repo fault"),
            ProtectedDeleteOutcome::NotFound
        );
    }

    #[test]
    fn repository_faults_propagate_unchanged() {
        let err = delete_protected(&FailingRepo, Uuid::new_v4()).expect_err("fault must surface");
        assert!(matches!(err, RepoError::MissingRequiredTable("statuses")));
    }
}
