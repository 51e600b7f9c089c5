//! Task use-case service.
//!
//! # Responsibility
//! - Provide gated task CRUD and filtered listing entry points.
//! - Stamp the creating principal as the immutable task author.
//!
//! # Invariants
//! - All task pages require an authenticated principal.
//! - The author comes from the acting principal, never from input.
//! - Delete resolves the stored author and applies the author-only
//!   rule before the store is touched.

use crate::auth::gate::{guard, guard_delete, Decision, GatePages, LOGIN_PAGE, TASKS_PAGE};
use crate::auth::policy::{Rule, TargetOwner};
use crate::auth::principal::Principal;
use crate::model::label::LabelId;
use crate::model::status::StatusId;
use crate::model::task::{Task, TaskId, TaskRecord};
use crate::model::user::UserId;
use crate::repo::task_repo::{TaskChanges, TaskFilter, TaskRepository};
use crate::repo::RepoResult;

const TASK_PAGES: GatePages = GatePages {
    login: LOGIN_PAGE,
    resource_list: TASKS_PAGE,
};

/// Input for creating one task.
///
/// The author is deliberately absent: it is stamped from the creating
/// principal's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub executor_id: Option<UserId>,
    pub label_ids: Vec<LabelId>,
}

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gates the list/detail/create/update entry points.
    pub fn guard_view(&self, principal: &Principal) -> Decision {
        guard(principal, &Rule::Authenticated, TASK_PAGES)
    }

    /// Creates one task authored by `author`. Callers gate entry with
    /// [`Self::guard_view`] and pass the acting principal's id.
    pub fn create(&mut self, author: UserId, request: &CreateTaskRequest) -> RepoResult<Task> {
        let mut task = Task::new(request.name.clone(), request.status_id, author);
        task.description = request.description.clone();
        task.executor_id = request.executor_id;
        task.label_ids = request.label_ids.clone();
        self.repo.create_task(&task)?;
        Ok(task)
    }

    /// Replaces the mutable fields of one task; the author is untouched.
    pub fn update(&mut self, id: TaskId, changes: &TaskChanges) -> RepoResult<()> {
        self.repo.update_task(id, changes)
    }

    /// Gets one task write model by id.
    pub fn get(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Gets one joined task record by id.
    pub fn get_record(&self, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        self.repo.get_task_record(id)
    }

    /// Lists joined task records matching the filter, oldest first.
    pub fn list(&self, filter: &TaskFilter) -> RepoResult<Vec<TaskRecord>> {
        self.repo.list_tasks(filter)
    }

    /// Deletes one task behind the full gate: authentication, the
    /// author-only rule, then the store-arbitrated delete.
    pub fn delete(&self, principal: &Principal, id: TaskId) -> RepoResult<Decision> {
        let target = match self.repo.get_task(id)? {
            Some(task) => TargetOwner::User(task.author_id),
            None => TargetOwner::Missing,
        };
        guard_delete(principal, &Rule::AuthorOnly(target), TASK_PAGES, &self.repo, id)
    }
}
