//! Access control and referential protection.
//!
//! # Responsibility
//! - Decide who may perform which operation (`policy`).
//! - Arbitrate deletes of possibly-referenced rows (`protect`).
//! - Compose both into the one decision path handlers consume (`gate`).
//!
//! # Invariants
//! - Authentication is always checked before ownership; anonymous
//!   callers never learn whether a target exists or who owns it.
//! - Every resource flows through this module; no handler carries its
//!   own ad-hoc checks.
//! - A denial is terminal for the request: re-evaluating the same
//!   inputs yields the same decision until state changes elsewhere.

pub mod gate;
pub mod policy;
pub mod principal;
pub mod protect;
