//! Requesting identity consumed by policy decisions.

use crate::model::user::UserId;

/// The identity behind one request.
///
/// Whatever session or login machinery exists upstream resolves each
/// request into one of these two values before core code runs;
/// credentials never reach this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// No valid session.
    Anonymous,
    /// A logged-in user with this id.
    Authenticated(UserId),
}

impl Principal {
    /// Returns true for logged-in principals.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the acting user id, or `None` for anonymous requests.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Authenticated(id) => Some(*id),
            Self::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Principal;
    use uuid::Uuid;

    #[test]
    fn anonymous_has_no_user_id() {
        assert!(!Principal::Anonymous.is_authenticated());
        assert_eq!(Principal::Anonymous.user_id(), None);
    }

    #[test]
    fn authenticated_exposes_user_id() {
        let id = Uuid::new_v4();
        let principal = Principal::Authenticated(id);
        assert!(principal.is_authenticated());
        assert_eq!(principal.user_id(), Some(id));
    }
}
