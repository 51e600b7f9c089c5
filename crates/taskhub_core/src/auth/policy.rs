//! Authorization rules and the pure decision function.
//!
//! # Responsibility
//! - Decide, without side effects, whether a principal may perform an
//!   operation under a given rule.
//! - Keep the evaluation order fixed: authentication before ownership.
//!
//! # Invariants
//! - Anonymous principals receive `DenyUnauthenticated` for every rule,
//!   before any target inspection.
//! - `TargetNotFound` is only ever returned to authenticated callers.
//! - Evaluation is deterministic: same principal and rule, same verdict.

use crate::auth::principal::Principal;
use crate::model::user::UserId;

/// Fixed message shown when a request requires login.
pub const MSG_LOGIN_REQUIRED: &str = "You are not authorized! Please sign in.";
/// Fixed message shown when a principal edits another user's account.
pub const MSG_NOT_OWNER: &str = "You have no rights to change another user.";
/// Fixed message shown when a non-author tries to delete a task.
pub const MSG_NOT_AUTHOR: &str = "A task can only be deleted by its author.";

/// Ownership fact about the entity a mutation addresses.
///
/// Callers resolve the target before evaluation, so a rule always
/// carries a definite answer instead of an unresolved id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOwner {
    /// The target row does not exist (or no longer exists).
    Missing,
    /// The target belongs to this user for mutation purposes.
    User(UserId),
}

/// Authorization rule for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any authenticated principal may proceed.
    Authenticated,
    /// Only the user the target account represents may proceed.
    SelfOnly(TargetOwner),
    /// Only the author of the target task may proceed.
    AuthorOnly(TargetOwner),
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The operation may proceed.
    Allow,
    /// The principal is anonymous; carries no target information.
    DenyUnauthenticated,
    /// The principal is authenticated but not the owner the rule names.
    DenyForbidden { message: &'static str },
    /// The rule's target entity does not exist.
    TargetNotFound,
}

/// Evaluates one rule for one principal.
///
/// Authentication is checked first, so an anonymous caller is turned
/// away before the target's existence or owner is even looked at.
pub fn authorize(principal: &Principal, rule: &Rule) -> Verdict {
    let Principal::Authenticated(actor) = principal else {
        return Verdict::DenyUnauthenticated;
    };

    match rule {
        Rule::Authenticated => Verdict::Allow,
        Rule::SelfOnly(target) => check_owner(*actor, target, MSG_NOT_OWNER),
        Rule::AuthorOnly(target) => check_owner(*actor, target, MSG_NOT_AUTHOR),
    }
}

fn check_owner(actor: UserId, target: &TargetOwner, deny_message: &'static str) -> Verdict {
    match target {
        TargetOwner::Missing => Verdict::TargetNotFound,
        TargetOwner::User(owner) if *owner == actor => Verdict::Allow,
        TargetOwner::User(_) => Verdict::DenyForbidden {
            message: deny_message,
        },
    }
}
