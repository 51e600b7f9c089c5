//! User account model.

use crate::model::{EntityKind, ModelValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable unique identifier of a user.
pub type UserId = Uuid;

/// Handles may contain word characters plus `@`, `.`, `+` and `-`.
static HANDLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("handle pattern must compile"));

/// One registered account.
///
/// The handle is the login-facing name and is unique across the store.
/// Credentials and session state live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Creates a user with a fresh random id and empty display names.
    pub fn new(handle: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), handle)
    }

    /// Creates a user with the given id.
    pub fn with_id(id: UserId, handle: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Returns `first_name last_name`, falling back to the handle when
    /// both names are blank.
    pub fn full_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, &self.handle)
    }

    /// Validates field-level rules.
    ///
    /// # Errors
    /// - `EmptyField` when the handle is empty or whitespace-only.
    /// - `InvalidHandle` when the handle contains disallowed characters.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.handle.trim().is_empty() {
            return Err(ModelValidationError::EmptyField {
                kind: EntityKind::User,
                field: "handle",
            });
        }
        if !HANDLE_PATTERN.is_match(&self.handle) {
            return Err(ModelValidationError::InvalidHandle {
                handle: self.handle.clone(),
            });
        }
        Ok(())
    }
}

/// Joins first and last name for display, falling back to `handle` when
/// both are blank.
pub fn display_name(first_name: &str, last_name: &str, handle: &str) -> String {
    let joined = format!("{} {}", first_name.trim(), last_name.trim());
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        handle.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::User;
    use crate::model::ModelValidationError;

    #[test]
    fn validate_accepts_word_chars_and_allowed_punctuation() {
        assert!(User::new("ada_l.42@host+x-y").validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_handle() {
        let err = User::new("   ").validate().expect_err("blank handle");
        assert!(matches!(err, ModelValidationError::EmptyField { .. }));
    }

    #[test]
    fn validate_rejects_disallowed_characters() {
        let err = User::new("ada lovelace").validate().expect_err("space");
        assert!(matches!(err, ModelValidationError::InvalidHandle { .. }));

        let err = User::new("ada#1").validate().expect_err("hash");
        assert!(matches!(err, ModelValidationError::InvalidHandle { .. }));
    }

    #[test]
    fn full_name_joins_names_and_falls_back_to_handle() {
        let mut user = User::new("ada");
        assert_eq!(user.full_name(), "ada");

        user.first_name = "Ada".to_string();
        user.last_name = "Lovelace".to_string();
        assert_eq!(user.full_name(), "Ada Lovelace");

        user.last_name = String::new();
        assert_eq!(user.full_name(), "Ada");
    }
}
