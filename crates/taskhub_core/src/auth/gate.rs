//! Access control gate composing policy and protected deletion.
//!
//! # Responsibility
//! - Provide the single decision path every resource handler uses.
//! - Map verdicts and delete outcomes onto one uniform `Decision`.
//!
//! # Invariants
//! - No delete runs unless the policy verdict is `Allow`.
//! - Unauthenticated denials redirect to the login page; forbidden and
//!   blocked outcomes redirect to the resource list, each with its fixed
//!   message.

use crate::auth::policy::{authorize, Rule, Verdict, MSG_LOGIN_REQUIRED};
use crate::auth::principal::Principal;
use crate::auth::protect::{delete_protected, ProtectedDeleteOutcome};
use crate::repo::{ProtectedDelete, RepoResult};
use log::debug;
use uuid::Uuid;

/// Login page, the deny target for unauthenticated requests.
pub const LOGIN_PAGE: &str = "/login";
/// User list page.
pub const USERS_PAGE: &str = "/users";
/// Status list page.
pub const STATUSES_PAGE: &str = "/statuses";
/// Label list page.
pub const LABELS_PAGE: &str = "/labels";
/// Task list page.
pub const TASKS_PAGE: &str = "/tasks";

/// Redirect destinations for one resource family's denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePages {
    /// Where unauthenticated requests are sent.
    pub login: &'static str,
    /// Where forbidden and blocked requests are sent.
    pub resource_list: &'static str,
}

/// Uniform outcome handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed; for deletes, the entity is gone.
    Proceed,
    /// The operation is refused; show `message` and go to `target`.
    Redirect {
        target: &'static str,
        message: &'static str,
    },
    /// The target entity does not exist; render a not-found response.
    NotFound,
}

impl Decision {
    /// Returns true when the operation may go ahead.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Gates one non-delete operation.
pub fn guard(principal: &Principal, rule: &Rule, pages: GatePages) -> Decision {
    match authorize(principal, rule) {
        Verdict::Allow => Decision::Proceed,
        Verdict::DenyUnauthenticated => {
            debug!("event=access_denied module=auth reason=unauthenticated");
            Decision::Redirect {
                target: pages.login,
                message: MSG_LOGIN_REQUIRED,
            }
        }
        Verdict::DenyForbidden { message } => {
            debug!("event=access_denied module=auth reason=forbidden");
            Decision::Redirect {
                target: pages.resource_list,
                message,
            }
        }
        Verdict::TargetNotFound => Decision::NotFound,
    }
}

/// Gates one delete operation and, when allowed, runs the protected
/// delete through `repo`.
///
/// The verdict comes first: a denied request never reaches the store. A
/// blocked delete redirects to the resource list with the kind-specific
/// reason.
///
/// # Errors
/// - Propagates repository faults unchanged.
pub fn guard_delete<R: ProtectedDelete>(
    principal: &Principal,
    rule: &Rule,
    pages: GatePages,
    repo: &R,
    id: Uuid,
) -> RepoResult<Decision> {
    let decision = guard(principal, rule, pages);
    if !decision.is_proceed() {
        return Ok(decision);
    }

    let outcome = delete_protected(repo, id)?;
    Ok(match outcome {
        ProtectedDeleteOutcome::Deleted => Decision::Proceed,
        ProtectedDeleteOutcome::Blocked { reason } => Decision::Redirect {
            target: pages.resource_list,
            message: reason,
        },
        ProtectedDeleteOutcome::NotFound => Decision::NotFound,
    })
}
