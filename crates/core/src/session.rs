//! Session state.

use serde::{Deserialize, Serialize};

use crate::types::{Identity, Role};

/// Authentication state of the client.
///
/// Starts as [`SessionState::Unknown`] and settles into one of the other two
/// variants once the stored credential has been checked. It never returns to
/// `Unknown` except through a full restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    /// Resolution of the stored credential has not settled yet.
    #[default]
    Unknown,
    /// A valid credential resolved to this identity.
    Authenticated(Identity),
    /// No credential, or the backend rejected it.
    Unauthenticated,
}

impl SessionState {
    /// Whether resolution has settled.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether an identity is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The resolved identity, if authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unknown | Self::Unauthenticated => None,
        }
    }

    /// The role of the resolved identity, if authenticated.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Authenticated(identity) => {
                write!(f, "signed in as {} ({})", identity.display_name(), identity.role)
            }
            Self::Unauthenticated => f.write_str("signed out"),
        }
    }
}
