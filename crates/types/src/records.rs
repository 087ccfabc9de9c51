//! Record and input types for the registry.
//!
//! Records are the documents persisted in the store; the `New*` structs
//! carry caller-supplied fields for creation, with generated identifiers
//! and forced initial state filled in by the registry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, MenteeId, NoteId, UserId};
use crate::role::Role;
use crate::status::MenteeStatus;

// ============================================================================
// Users
// ============================================================================

/// A registered user of the dashboard.
///
/// The identifier is always `User#<lowercased email>`; the email field is
/// stored lowercased so the two never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Email-derived identifier.
    pub id: UserId,
    /// Email address (lowercase normalized, unique across users).
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Faculty the user belongs to.
    pub faculty: String,
    /// Authorization role.
    pub role: Role,
    /// Start of the contractor agreement window, if any.
    pub agreement_start: Option<NaiveDate>,
    /// End of the contractor agreement window, if any.
    pub agreement_end: Option<NaiveDate>,
}

/// Caller-supplied fields for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address; lowercased before the identifier is derived.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Faculty the user belongs to.
    pub faculty: String,
    /// Authorization role.
    pub role: Role,
    /// Start of the contractor agreement window, if any.
    pub agreement_start: Option<NaiveDate>,
    /// End of the contractor agreement window, if any.
    pub agreement_end: Option<NaiveDate>,
}

/// Stored credential for a user, kept separate from the user record.
///
/// Holds only the salted bcrypt hash; the plaintext never touches the
/// store and the hash never leaves the identity store. Verification goes
/// through `bcrypt::verify`, never value comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    /// Salted bcrypt hash of the credential.
    pub hash: String,
}

// ============================================================================
// Mentees and notes
// ============================================================================

/// A mentee tracked through the onboarding lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentee {
    /// Opaque identifier, immutable once assigned.
    pub id: MenteeId,
    /// The assigned buddy's user identifier.
    pub buddy_id: UserId,
    /// ISO country code of the mentee's home country.
    pub country_code: String,
    /// Home university the mentee comes from.
    pub home_university: String,
    /// Faculty hosting the mentee.
    pub host_faculty: String,
    /// Email address (lowercase normalized; uniqueness checked, not enforced).
    pub email: String,
    /// Self-reported gender.
    pub gender: String,
    /// Degree programme.
    pub degree: String,
    /// Start of the agreement window, if any.
    pub agreement_start: Option<NaiveDate>,
    /// End of the agreement window, if any.
    pub agreement_end: Option<NaiveDate>,
    /// Onboarding status; always `Assigned` on creation.
    pub status: MenteeStatus,
}

/// Caller-supplied fields for creating a mentee.
///
/// Carries no status field: creation always starts at
/// [`MenteeStatus::Assigned`] regardless of caller intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMentee {
    /// The assigned buddy's user identifier.
    pub buddy_id: UserId,
    /// ISO country code of the mentee's home country.
    pub country_code: String,
    /// Home university the mentee comes from.
    pub home_university: String,
    /// Faculty hosting the mentee.
    pub host_faculty: String,
    /// Email address; lowercased on creation.
    pub email: String,
    /// Self-reported gender.
    pub gender: String,
    /// Degree programme.
    pub degree: String,
    /// Start of the agreement window, if any.
    pub agreement_start: Option<NaiveDate>,
    /// End of the agreement window, if any.
    pub agreement_end: Option<NaiveDate>,
}

/// A free-text note attached to a mentee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque identifier within the mentee partition.
    pub id: NoteId,
    /// Free-text content.
    pub content: String,
    /// Identifier of the authoring user.
    pub author_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stamped on every content update; absent until the first one.
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Assets
// ============================================================================

/// A piece of equipment or material owned by a user.
///
/// Counted by the user-deletion rule: a user owning assets can not be
/// deleted until the assets are reassigned or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque identifier.
    pub id: AssetId,
    /// Short display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Identifier of the owning user.
    pub owner_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    /// Short display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Identifier of the owning user.
    pub owner_id: UserId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_round_trips_through_json() {
        let user = User {
            id: UserId::from_email("alice@example.com"),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Adams".to_string(),
            faculty: "Engineering".to_string(),
            role: Role::Hr,
            agreement_start: NaiveDate::from_ymd_opt(2025, 9, 1),
            agreement_end: None,
        };

        let bytes = serde_json::to_vec(&user).expect("serialize");
        let back: User = serde_json::from_slice(&bytes).expect("deserialize");
        assert_eq!(back, user);
    }

    #[test]
    fn test_note_update_timestamp_is_optional_on_wire() {
        let note = Note {
            id: NoteId::new("n-1"),
            content: "first contact made".to_string(),
            author_id: UserId::from_email("b@example.com"),
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&note).expect("serialize");
        assert!(json.get("updated_at").expect("field present").is_null());
    }
}
