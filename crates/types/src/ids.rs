//! String identifier newtypes.
//!
//! Every record in the registry is addressed by a string identifier. The
//! opaque ones (mentee, note, asset) are generated as UUIDs; the user
//! identifier is derived deterministically from the lowercased email so
//! that by-email and by-id lookups always agree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::USER_PREFIX;

/// Generates a newtype wrapper around `String` for type-safe identifiers.
///
/// Each generated type provides:
/// - Standard derives: Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord
/// - Serde with `#[serde(transparent)]` for wire format compatibility
/// - `new()` constructor, `generate()` for a fresh opaque id, `as_str()` accessor
/// - `Display` printing the raw identifier
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generates a fresh opaque, collision-resistant identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_string_id!(
    /// Opaque identifier for a mentee. Immutable once assigned.
    MenteeId
);

define_string_id!(
    /// Opaque identifier for a note within a mentee partition.
    NoteId
);

define_string_id!(
    /// Opaque identifier for an asset.
    AssetId
);

/// Identifier for a user.
///
/// Always the string `User#<lowercased email>`; the email is recoverable
/// from the identifier and vice versa. Because the derivation lowercases
/// the email, `UserId::from_email` is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Derives the identifier for the given email address.
    pub fn from_email(email: &str) -> Self {
        Self(format!("{USER_PREFIX}{}", email.to_lowercase()))
    }

    /// Wraps an already-derived identifier value.
    ///
    /// The value is expected to carry the `User#` prefix; use
    /// [`UserId::from_email`] when starting from an email address.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the email address embedded in the identifier, if well-formed.
    pub fn email(&self) -> Option<&str> {
        self.0.strip_prefix(USER_PREFIX)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_derivation_lowercases() {
        let id = UserId::from_email("Alice@Example.COM");
        assert_eq!(id.as_str(), "User#alice@example.com");
        assert_eq!(id.email(), Some("alice@example.com"));
    }

    #[test]
    fn test_user_id_derivation_is_case_insensitive() {
        assert_eq!(
            UserId::from_email("bob@example.com"),
            UserId::from_email("BOB@example.com")
        );
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = MenteeId::generate();
        let b = MenteeId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_string_id_serde_is_transparent() {
        let id = NoteId::new("abc123");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"abc123\"");
        let back: NoteId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
