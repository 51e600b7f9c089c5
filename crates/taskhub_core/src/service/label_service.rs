//! Label use-case service.
//!
//! # Responsibility
//! - Provide gated CRUD entry points for the label catalog.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - All label pages require an authenticated principal.
//! - Deletes run through the gate; a label still attached to tasks is
//!   never removed.

use crate::auth::gate::{guard, guard_delete, Decision, GatePages, LABELS_PAGE, LOGIN_PAGE};
use crate::auth::policy::Rule;
use crate::auth::principal::Principal;
use crate::model::label::{Label, LabelId};
use crate::repo::label_repo::LabelRepository;
use crate::repo::RepoResult;

const LABEL_PAGES: GatePages = GatePages {
    login: LOGIN_PAGE,
    resource_list: LABELS_PAGE,
};

/// Use-case service wrapper for label operations.
pub struct LabelService<R: LabelRepository> {
    repo: R,
}

impl<R: LabelRepository> LabelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gates the list/detail/create/update entry points.
    pub fn guard_view(&self, principal: &Principal) -> Decision {
        guard(principal, &Rule::Authenticated, LABEL_PAGES)
    }

    /// Creates one label. Callers gate entry with [`Self::guard_view`].
    pub fn create(&self, name: impl Into<String>) -> RepoResult<Label> {
        let label = Label::new(name);
        self.repo.create_label(&label)?;
        Ok(label)
    }

    /// Renames an existing label.
    pub fn update(&self, id: LabelId, name: impl Into<String>) -> RepoResult<Label> {
        let label = Label::with_id(id, name);
        self.repo.update_label(&label)?;
        Ok(label)
    }

    /// Gets one label by id.
    pub fn get(&self, id: LabelId) -> RepoResult<Option<Label>> {
        self.repo.get_label(id)
    }

    /// Lists all labels in creation order.
    pub fn list(&self) -> RepoResult<Vec<Label>> {
        self.repo.list_labels()
    }

    /// Deletes one label behind the full gate: authentication first,
    /// then the store-arbitrated referential protection.
    pub fn delete(&self, principal: &Principal, id: LabelId) -> RepoResult<Decision> {
        guard_delete(principal, &Rule::Authenticated, LABEL_PAGES, &self.repo, id)
    }
}
