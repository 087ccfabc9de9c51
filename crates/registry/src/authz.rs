//! Authorization rules.
//!
//! All checks are pure functions over already-loaded records; they never
//! touch the store and never fail. A refused mutation is reported as a
//! [`Decision::Denied`] carrying a reason the caller can show to the end
//! user, not as an error.

use buddydesk_types::{Note, Role, User};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The actor may proceed.
    Allowed,
    /// The actor may not proceed.
    Denied {
        /// Human-readable reason for the first violated rule.
        reason: &'static str,
    },
}

impl Decision {
    fn denied(reason: &'static str) -> Self {
        Self::Denied { reason }
    }

    /// Returns true when the check passed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the denial reason, if any.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Allowed => None,
            Self::Denied { reason } => Some(reason),
        }
    }
}

/// Decides whether `actor` may delete `target`.
///
/// Rules are evaluated in order and the first failing rule wins:
/// 1. nobody may delete themselves,
/// 2. an admin can never be deleted,
/// 3. the actor's role must be strictly above the target's,
/// 4. the target must have no mentees assigned,
/// 5. the target must own no assets.
///
/// The mentee and asset counts are passed in by the caller; see
/// `Registry::can_delete_user` for the variant that gathers them.
pub fn check_delete_user(
    actor: &User,
    target: &User,
    target_mentee_count: usize,
    target_asset_count: usize,
) -> Decision {
    if actor.id == target.id {
        return Decision::denied("You can not delete yourself");
    }
    if target.role == Role::Admin {
        return Decision::denied("You can not delete an admin");
    }
    if actor.role <= target.role {
        return Decision::denied("You can not delete a user with an equal or higher role");
    }
    if target_mentee_count > 0 {
        return Decision::denied("You can not delete a user with assigned mentees");
    }
    if target_asset_count > 0 {
        return Decision::denied("You can not delete a user with assigned assets");
    }
    Decision::Allowed
}

/// Returns true when the user may mutate mentee records.
///
/// Buddies are read-only on mentee records; every role above buddy may
/// mutate. Ownership of specific mentees is enforced by callers.
pub fn can_mutate_mentee(user: &User) -> bool {
    user.role > Role::Buddy
}

/// Returns true when the user may mutate the given note.
///
/// The note's author may always edit it; otherwise any role above buddy
/// may.
pub fn can_mutate_note(user: &User, note: &Note) -> bool {
    note.author_id == user.id || user.role > Role::Buddy
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use buddydesk_types::{NoteId, UserId};
    use chrono::Utc;

    use super::*;

    fn user(email: &str, role: Role) -> User {
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

    fn note_by(author: &User) -> Note {
        Note {
            id: NoteId::new("n-1"),
            content: "hello".to_string(),
            author_id: author.id.clone(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_self_deletion_is_denied() {
        let admin = user("admin@example.com", Role::Admin);
        let decision = check_delete_user(&admin, &admin, 0, 0);
        assert_eq!(decision.reason(), Some("You can not delete yourself"));
    }

    #[test]
    fn test_admins_are_never_deletable() {
        let hr = user("hr@example.com", Role::Hr);
        let admin = user("admin@example.com", Role::Admin);
        let decision = check_delete_user(&hr, &admin, 0, 0);
        assert!(!decision.is_allowed());
        assert_eq!(decision.reason(), Some("You can not delete an admin"));
    }

    #[test]
    fn test_equal_or_higher_role_is_denied() {
        let hr = user("hr@example.com", Role::Hr);
        let peer = user("peer@example.com", Role::Hr);
        let president = user("president@example.com", Role::President);

        let decision = check_delete_user(&hr, &peer, 0, 0);
        assert_eq!(
            decision.reason(),
            Some("You can not delete a user with an equal or higher role")
        );
        assert!(!check_delete_user(&hr, &president, 0, 0).is_allowed());
    }

    #[test]
    fn test_targets_with_mentees_or_assets_are_denied() {
        let admin = user("admin@example.com", Role::Admin);
        let buddy = user("buddy@example.com", Role::Buddy);

        assert_eq!(
            check_delete_user(&admin, &buddy, 3, 0).reason(),
            Some("You can not delete a user with assigned mentees")
        );
        assert_eq!(
            check_delete_user(&admin, &buddy, 0, 1).reason(),
            Some("You can not delete a user with assigned assets")
        );
    }

    #[test]
    fn test_admin_may_delete_idle_buddy() {
        let admin = user("admin@example.com", Role::Admin);
        let buddy = user("buddy@example.com", Role::Buddy);
        assert_eq!(check_delete_user(&admin, &buddy, 0, 0), Decision::Allowed);
    }

    #[test]
    fn test_rules_fire_in_order() {
        // A buddy target with mentees still reports the role-order denial
        // first when the actor outranks nobody.
        let buddy = user("buddy@example.com", Role::Buddy);
        let other = user("other@example.com", Role::Buddy);
        let decision = check_delete_user(&buddy, &other, 5, 5);
        assert_eq!(
            decision.reason(),
            Some("You can not delete a user with an equal or higher role")
        );
    }

    #[test]
    fn test_buddies_cannot_mutate_mentees() {
        assert!(!can_mutate_mentee(&user("b@example.com", Role::Buddy)));
        assert!(can_mutate_mentee(&user("h@example.com", Role::Hr)));
        assert!(can_mutate_mentee(&user("a@example.com", Role::Admin)));
    }

    #[test]
    fn test_note_mutation_matrix() {
        let author = user("author@example.com", Role::Buddy);
        let other_buddy = user("other@example.com", Role::Buddy);
        let hr = user("hr@example.com", Role::Hr);
        let note = note_by(&author);

        assert!(can_mutate_note(&author, &note), "authoring buddy may edit");
        assert!(!can_mutate_note(&other_buddy, &note), "non-author buddy may not");
        assert!(can_mutate_note(&hr, &note), "non-buddy may edit regardless of authorship");
    }
}
