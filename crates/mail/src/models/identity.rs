//! Signed-in user identity and the bearer credential that goes with it

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when no profile source yields an identity
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

/// The human-readable identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Display name (e.g., "Jane Doe")
    pub name: String,
    /// Primary email address, empty when unknown
    pub email: String,
    /// Avatar URL, only available from the id token
    pub picture: Option<String>,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            picture: None,
        }
    }

    pub fn with_picture(mut self, picture: Option<String>) -> Self {
        self.picture = picture;
        self
    }

    /// Sentinel identity for when every profile lookup failed
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_USER_NAME, "")
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_USER_NAME && self.email.is_empty()
    }

    /// Format the identity for a status line
    pub fn display(&self) -> String {
        if self.email.is_empty() {
            self.name.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

/// Opaque OAuth bearer token
///
/// The value is never printed through `Debug` so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Value for an `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_identity() {
        let user = UserIdentity::unknown();
        assert_eq!(user.name, "Unknown User");
        assert_eq!(user.email, "");
        assert!(user.picture.is_none());
        assert!(user.is_unknown());
    }

    #[test]
    fn test_display_with_and_without_email() {
        assert_eq!(
            UserIdentity::new("Jane Doe", "jane@example.com").display(),
            "Jane Doe <jane@example.com>"
        );
        assert_eq!(UserIdentity::new("Jane Doe", "").display(), "Jane Doe");
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("ya29.secret-value");
        let printed = format!("{:?}", token);
        assert!(!printed.contains("secret-value"));
        assert_eq!(token.bearer_header(), "Bearer ya29.secret-value");
    }
}
