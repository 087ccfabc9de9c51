//! Record fixtures for tests.

use buddydesk_types::{NewAsset, NewMentee, NewUser, Role, User, UserId};

/// Builds creation input for a user with placeholder names.
pub fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        faculty: "Engineering".to_string(),
        role,
        agreement_start: None,
        agreement_end: None,
    }
}

/// Builds a user record directly, bypassing the identity store.
///
/// Useful for pure authorization tests that never touch storage.
pub fn user(email: &str, role: Role) -> User {
    User {
        id: UserId::from_email(email),
        email: email.to_lowercase(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        faculty: "Engineering".to_string(),
        role,
        agreement_start: None,
        agreement_end: None,
    }
}

/// Builds creation input for a mentee assigned to the given buddy.
pub fn new_mentee(email: &str, buddy_email: &str) -> NewMentee {
    NewMentee {
        buddy_id: UserId::from_email(buddy_email),
        country_code: "DE".to_string(),
        home_university: "TU Munich".to_string(),
        host_faculty: "Informatics".to_string(),
        email: email.to_string(),
        gender: "female".to_string(),
        degree: "master".to_string(),
        agreement_start: None,
        agreement_end: None,
    }
}

/// Builds creation input for an asset owned by the given user.
pub fn new_asset(name: &str, owner_email: &str) -> NewAsset {
    NewAsset {
        name: name.to_string(),
        description: "fixture asset".to_string(),
        owner_id: UserId::from_email(owner_email),
    }
}
