//! User account use-case service.
//!
//! # Responsibility
//! - Provide account registration, listing and gated self-service
//!   mutation entry points.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Registration and the account list are open to anonymous callers.
//! - Update and delete require the principal to be the target account;
//!   the gate resolves the owner before deciding.
//! - Deletes run through the gate; an account still authoring or
//!   executing tasks is never removed.

use crate::auth::gate::{guard, guard_delete, Decision, GatePages, LOGIN_PAGE, USERS_PAGE};
use crate::auth::policy::{Rule, TargetOwner};
use crate::auth::principal::Principal;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

const USER_PAGES: GatePages = GatePages {
    login: LOGIN_PAGE,
    resource_list: USERS_PAGE,
};

/// Registration input for one new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
}

/// Replacement fields for one existing account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
}

/// Use-case service wrapper for account operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one account. Needs no session; sign-up is public.
    pub fn register(&self, request: &RegisterUserRequest) -> RepoResult<User> {
        let mut user = User::new(request.handle.clone());
        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();
        self.repo.create_user(&user)?;
        Ok(user)
    }

    /// Gates the update/delete entry points: the target account must be
    /// the principal's own.
    pub fn guard_mutate(&self, principal: &Principal, id: UserId) -> RepoResult<Decision> {
        let target = self.owner_of(id)?;
        Ok(guard(principal, &Rule::SelfOnly(target), USER_PAGES))
    }

    /// Replaces handle and display names of one account. Callers gate
    /// entry with [`Self::guard_mutate`].
    pub fn update(&self, id: UserId, request: &UpdateUserRequest) -> RepoResult<User> {
        let mut user = User::with_id(id, request.handle.clone());
        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();
        self.repo.update_user(&user)?;
        Ok(user)
    }

    /// Gets one account by id.
    pub fn get(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }

    /// Gets one account by handle.
    pub fn find_by_handle(&self, handle: &str) -> RepoResult<Option<User>> {
        self.repo.find_by_handle(handle)
    }

    /// Lists all accounts in creation order. The directory is public.
    pub fn list(&self) -> RepoResult<Vec<User>> {
        self.repo.list_users()
    }

    /// Deletes one account behind the full gate: authentication, self
    /// ownership, then the store-arbitrated referential protection.
    pub fn delete(&self, principal: &Principal, id: UserId) -> RepoResult<Decision> {
        let target = self.owner_of(id)?;
        guard_delete(principal, &Rule::SelfOnly(target), USER_PAGES, &self.repo, id)
    }

    fn owner_of(&self, id: UserId) -> RepoResult<TargetOwner> {
        Ok(match self.repo.get_user(id)? {
            Some(user) => TargetOwner::User(user.id),
            None => TargetOwner::Missing,
        })
    }
}
