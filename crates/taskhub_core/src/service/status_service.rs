//! Status use-case service.
//!
//! # Responsibility
//! - Provide gated CRUD entry points for the status catalog.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - All status pages require an authenticated principal.
//! - Deletes run through the gate; a status assigned to tasks is never
//!   removed.

use crate::auth::gate::{guard, guard_delete, Decision, GatePages, LOGIN_PAGE, STATUSES_PAGE};
use crate::auth::policy::Rule;
use crate::auth::principal::Principal;
use crate::model::status::{Status, StatusId};
use crate::repo::status_repo::StatusRepository;
use crate::repo::RepoResult;

const STATUS_PAGES: GatePages = GatePages {
    login: LOGIN_PAGE,
    resource_list: STATUSES_PAGE,
};

/// Use-case service wrapper for status operations.
pub struct StatusService<R: StatusRepository> {
    repo: R,
}

impl<R: StatusRepository> StatusService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gates the list/detail/create/update entry points.
    pub fn guard_view(&self, principal: &Principal) -> Decision {
        guard(principal, &Rule::Authenticated, STATUS_PAGES)
    }

    /// Creates one status. Callers gate entry with [`Self::guard_view`].
    pub fn create(&self, name: impl Into<String>) -> RepoResult<Status> {
        let status = Status::new(name);
        self.repo.create_status(&status)?;
        Ok(status)
    }

    /// Renames an existing status.
    pub fn update(&self, id: StatusId, name: impl Into<String>) -> RepoResult<Status> {
        let status = Status::with_id(id, name);
        self.repo.update_status(&status)?;
        Ok(status)
    }

    /// Gets one status by id.
    pub fn get(&self, id: StatusId) -> RepoResult<Option<Status>> {
        self.repo.get_status(id)
    }

    /// Lists all statuses in creation order.
    pub fn list(&self) -> RepoResult<Vec<Status>> {
        self.repo.list_statuses()
    }

    /// Deletes one status behind the full gate: authentication first,
    /// then the store-arbitrated referential protection.
    pub fn delete(&self, principal: &Principal, id: StatusId) -> RepoResult<Decision> {
        guard_delete(principal, &Rule::Authenticated, STATUS_PAGES, &self.repo, id)
    }
}
