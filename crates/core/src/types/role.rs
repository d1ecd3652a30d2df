//! User roles.

use serde::{Deserialize, Serialize};

/// Role held by an authenticated user.
///
/// Roles gate which dashboard routes a user may reach. The backend encodes
/// them as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Academic advisor: sees at-risk students and logs interventions.
    Advisor,
    /// Student: sees their own progress and study plan.
    Student,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 2] = [Self::Advisor, Self::Student];

    /// The wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advisor => "advisor",
            Self::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "advisor" => Ok(Self::Advisor),
            "student" => Ok(Self::Student),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Advisor).unwrap(), "\"advisor\"");
        let role: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_matches_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
