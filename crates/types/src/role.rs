//! The ordered role hierarchy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authorization role, ordered from least to most privileged.
///
/// The wire encoding is the legacy numeric-string form (`"0"` through
/// `"3"`) for store compatibility; comparisons use the declaration order,
/// so `Role::Buddy < Role::Hr < Role::President < Role::Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Lowest-privilege role; mentors one or more mentees.
    #[serde(rename = "0")]
    Buddy,
    /// Human-resources role; manages mentees and buddies.
    #[serde(rename = "1")]
    Hr,
    /// Section president; manages HR users and below.
    #[serde(rename = "2")]
    President,
    /// Top role; full administrative access, never deletable.
    #[serde(rename = "3")]
    Admin,
}

impl Role {
    /// All roles in ascending privilege order.
    pub const ALL: [Role; 4] = [Role::Buddy, Role::Hr, Role::President, Role::Admin];

    /// Returns the legacy numeric-string code stored on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Self::Buddy => "0",
            Self::Hr => "1",
            Self::President => "2",
            Self::Admin => "3",
        }
    }

    /// Returns the human-readable label for this role.
    pub fn label(self) -> &'static str {
        match self {
            Self::Buddy => "Buddy",
            Self::Hr => "HR",
            Self::President => "President",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses either the numeric-string code or the human-readable label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "Buddy" => Ok(Self::Buddy),
            "1" | "HR" => Ok(Self::Hr),
            "2" | "President" => Ok(Self::President),
            "3" | "Admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_role_total_order() {
        assert!(Role::Buddy < Role::Hr);
        assert!(Role::Hr < Role::President);
        assert!(Role::President < Role::Admin);
    }

    #[test]
    fn test_role_wire_encoding_is_numeric_string() {
        assert_eq!(serde_json::to_string(&Role::Buddy).expect("serialize"), "\"0\"");
        assert_eq!(serde_json::to_string(&Role::Admin).expect("serialize"), "\"3\"");

        let role: Role = serde_json::from_str("\"2\"").expect("deserialize");
        assert_eq!(role, Role::President);
    }

    #[test]
    fn test_role_codes_match_declaration_order() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.code(), i.to_string());
        }
    }

    #[test]
    fn test_role_from_str_accepts_code_and_label() {
        assert_eq!("1".parse::<Role>().unwrap(), Role::Hr);
        assert_eq!("HR".parse::<Role>().unwrap(), Role::Hr);
        assert!("4".parse::<Role>().is_err());
    }
}
