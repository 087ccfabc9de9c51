//! End-to-end lifecycle tests over an in-memory registry.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]

use buddydesk_registry::{Registry, RegistryError};
use buddydesk_test_utils::{TestDir, new_mentee, new_user};
use buddydesk_types::{MenteeStatus, RegistryConfig, Role, UserId};

fn registry() -> Registry {
    // A low bcrypt cost keeps the hashing tests fast.
    let mut config = RegistryConfig::default();
    config.password.cost = 4;
    Registry::open_in_memory(&config).expect("open registry")
}

#[test]
fn by_email_and_by_derived_id_lookups_agree() {
    let registry = registry();
    registry
        .identity()
        .create_user(new_user("Alice@Example.COM", Role::Hr), "s3cret")
        .expect("create user");

    let by_email = registry
        .identity()
        .get_user_by_email("ALICE@example.com")
        .expect("lookup")
        .expect("present");
    let by_id = registry
        .identity()
        .get_user_by_id(&UserId::from_email("alice@example.com"))
        .expect("lookup")
        .expect("present");

    assert_eq!(by_email, by_id);
    assert_eq!(by_email.email, "alice@example.com");
    assert_eq!(by_email.id.as_str(), "User#alice@example.com");
}

#[test]
fn create_user_returns_the_stored_record() {
    let registry = registry();
    let created = registry
        .identity()
        .create_user(new_user("bob@example.com", Role::Buddy), "hunter2")
        .expect("create user");

    let stored = registry
        .identity()
        .get_user_by_id(&created.id)
        .expect("lookup")
        .expect("present");
    assert_eq!(created, stored);
}

#[test]
fn login_verifies_only_the_original_password() {
    let registry = registry();
    registry
        .identity()
        .create_user(new_user("carol@example.com", Role::Buddy), "correct horse")
        .expect("create user");

    let ok = registry
        .identity()
        .verify_login("Carol@Example.com", "correct horse")
        .expect("verify");
    assert!(ok.is_some(), "original password verifies");

    let wrong = registry
        .identity()
        .verify_login("carol@example.com", "battery staple")
        .expect("verify");
    let unknown = registry
        .identity()
        .verify_login("nobody@example.com", "correct horse")
        .expect("verify");
    // Wrong password and unknown email are indistinguishable.
    assert!(wrong.is_none());
    assert!(unknown.is_none());
}

#[test]
fn deleting_a_user_also_revokes_the_credential() {
    let registry = registry();
    registry
        .identity()
        .create_user(new_user("dave@example.com", Role::Buddy), "pw")
        .expect("create user");

    registry.identity().delete_user_by_email("dave@example.com").expect("delete");

    assert!(registry.identity().get_user_by_email("dave@example.com").expect("lookup").is_none());
    assert!(registry.identity().verify_login("dave@example.com", "pw").expect("verify").is_none());
}

#[test]
fn update_user_rejects_an_id_email_mismatch() {
    let registry = registry();
    let mut user = registry
        .identity()
        .create_user(new_user("erin@example.com", Role::Hr), "pw")
        .expect("create user");

    user.email = "someone-else@example.com".to_string();
    let err = registry.identity().update_user(&user).expect_err("rejected");
    assert!(matches!(err, RegistryError::Validation { .. }));
}

#[test]
fn update_user_replaces_the_whole_record() {
    let registry = registry();
    let mut user = registry
        .identity()
        .create_user(new_user("frank@example.com", Role::Buddy), "pw")
        .expect("create user");

    user.faculty = "Economics".to_string();
    user.role = Role::Hr;
    registry.identity().update_user(&user).expect("update");

    let stored = registry
        .identity()
        .get_user_by_email("frank@example.com")
        .expect("lookup")
        .expect("present");
    assert_eq!(stored.faculty, "Economics");
    assert_eq!(stored.role, Role::Hr);
}

#[test]
fn created_mentees_always_start_assigned() {
    let registry = registry();
    let mentee = registry
        .mentees()
        .create_mentee(new_mentee("mentee@example.com", "buddy@example.com"))
        .expect("create mentee");

    assert_eq!(mentee.status, MenteeStatus::Assigned);

    // Every status remains reachable afterwards; no transition table.
    for status in MenteeStatus::ALL {
        let updated = registry
            .mentees()
            .update_mentee_status(&mentee.id, status)
            .expect("update")
            .expect("present");
        assert_eq!(updated.status, status);
    }
}

#[test]
fn cascade_delete_removes_the_mentee_and_every_note() {
    let registry = registry();
    let buddy = UserId::from_email("buddy@example.com");
    let mentee = registry
        .mentees()
        .create_mentee(new_mentee("mentee@example.com", "buddy@example.com"))
        .expect("create mentee");

    for content in ["first contact", "picked up from airport", "campus tour done"] {
        registry.mentees().create_note(&mentee.id, &buddy, content).expect("create note");
    }
    assert_eq!(registry.mentees().get_notes_of_mentee(&mentee.id).expect("list").len(), 3);

    registry.mentees().delete_mentee(&mentee.id).expect("delete");

    assert!(registry.mentees().get_mentee_by_id(&mentee.id).expect("lookup").is_none());
    assert!(registry.mentees().get_notes_of_mentee(&mentee.id).expect("list").is_empty());
}

#[test]
fn email_uniqueness_follows_mentee_lifecycle() {
    let registry = registry();
    assert!(registry.mentees().is_email_unique("m@example.com").expect("check"));

    let mentee = registry
        .mentees()
        .create_mentee(new_mentee("M@Example.com", "buddy@example.com"))
        .expect("create mentee");
    assert!(!registry.mentees().is_email_unique("m@example.com").expect("check"));
    assert!(!registry.mentees().is_email_unique("M@EXAMPLE.COM").expect("check"));

    registry.mentees().delete_mentee(&mentee.id).expect("delete");
    assert!(registry.mentees().is_email_unique("m@example.com").expect("check"));
}

#[test]
fn notes_from_different_mentees_stay_separated() {
    let registry = registry();
    let buddy = UserId::from_email("buddy@example.com");
    let first = registry
        .mentees()
        .create_mentee(new_mentee("a@example.com", "buddy@example.com"))
        .expect("create mentee");
    let second = registry
        .mentees()
        .create_mentee(new_mentee("b@example.com", "buddy@example.com"))
        .expect("create mentee");

    registry.mentees().create_note(&first.id, &buddy, "only for the first").expect("create note");

    assert_eq!(registry.mentees().get_notes_of_mentee(&first.id).expect("list").len(), 1);
    assert!(registry.mentees().get_notes_of_mentee(&second.id).expect("list").is_empty());
}

#[test]
fn file_backed_registry_survives_reopen() {
    let dir = TestDir::new();
    let mut config = RegistryConfig::default();
    config.data_path = Some(dir.join("registry.redb"));
    config.password.cost = 4;

    let mentee_id = {
        let registry = Registry::open(&config).expect("open registry");
        registry
            .identity()
            .create_user(new_user("grace@example.com", Role::President), "pw")
            .expect("create user");
        let mentee = registry
            .mentees()
            .create_mentee(new_mentee("m@example.com", "grace@example.com"))
            .expect("create mentee");
        mentee.id
    };

    let reopened = Registry::open(&config).expect("reopen registry");
    assert!(reopened.identity().get_user_by_email("grace@example.com").expect("lookup").is_some());
    let mentee = reopened
        .mentees()
        .get_mentee_by_id(&mentee_id)
        .expect("lookup")
        .expect("present");
    assert_eq!(mentee.email, "m@example.com");
    assert_eq!(
        reopened
            .mentees()
            .get_mentee_count(&UserId::from_email("grace@example.com"))
            .expect("count"),
        1
    );
}
