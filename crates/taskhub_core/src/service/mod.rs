//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gate decisions and repository calls into use-case APIs.
//! - Keep UI layers decoupled from storage and policy details.
//!
//! # Invariants
//! - Mutating entry points resolve ownership and go through
//!   `crate::auth::gate`; services never re-implement checks inline.

pub mod label_service;
pub mod status_service;
pub mod task_service;
pub mod user_service;
