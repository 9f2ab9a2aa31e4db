//! Session record.

use crate::auth::Role;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the role.
pub const ROLE_KEY: &str = "role";
/// Storage key for the email.
pub const EMAIL_KEY: &str = "email";
/// Every key a session owns.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, ROLE_KEY, EMAIL_KEY];

/// The signed-in actor, as far as the client knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Role,
    pub email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role, email: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            role,
            email,
        }
    }

    /// The logged-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    /// Token to send as `Authorization: Bearer`, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    /// Email used to identify the actor to profile endpoints.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = Session::new("", Role::Admin, None);
        assert!(!session.is_authenticated());
        assert!(session.bearer().is_none());
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert_eq!(session.role, Role::Anonymous);
        assert!(session.email().is_none());
    }

    #[test]
    fn test_authenticated_session() {
        let session = Session::new("abc", Role::User, Some("ada@example.com".to_string()));
        assert!(session.is_authenticated());
        assert_eq!(session.bearer(), Some("abc"));
        assert_eq!(session.email(), Some("ada@example.com"));
    }
}
