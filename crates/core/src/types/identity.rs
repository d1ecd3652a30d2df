//! Resolved user identity.

use serde::{Deserialize, Serialize};

use super::{Role, UserId};

/// The user behind a valid credential, as reported by the identity endpoint.
///
/// Never persisted: it is recomputed from the credential every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account ID.
    pub id: UserId,
    /// Display name. Empty when the account has no advisor/student profile.
    #[serde(default)]
    pub name: String,
    /// Role claim carried by the credential.
    pub role: Role,
    /// Login email, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    /// Create an identity without an email.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            email: None,
        }
    }

    /// Name to show in a header bar, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.email.as_deref().unwrap_or("")
        } else {
            &self.name
        }
    }
}
