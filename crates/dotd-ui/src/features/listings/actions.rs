//! Listing actions, their access rules, and display helpers.

use crate::core::auth::AccessRule;
use crate::features::listings::state::CreationCard;
use crate::i18n::TranslationBundle;

/// User actions emitted from listing and detail controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingAction {
    /// Like / unlike the creation.
    ToggleLike,
    /// Promote / demote the creation (admin curation).
    TogglePick,
    /// Remove the creation.
    Delete,
}

/// The access rule each action places on the session.
#[must_use]
pub const fn access_rule<'a>(
    action: ListingAction,
    card: &'a CreationCard,
) -> AccessRule<'a> {
    match action {
        ListingAction::ToggleLike => AccessRule::SignedIn,
        ListingAction::TogglePick => AccessRule::Admin,
        ListingAction::Delete => AccessRule::AdminOrOwner {
            owner_id: card.owner_id.as_str(),
        },
    }
}

/// Toast message for a failed action.
#[must_use]
pub fn failure_message(bundle: &TranslationBundle, action: ListingAction) -> String {
    match action {
        ListingAction::ToggleLike => {
            bundle.text("toast.like_failed", "Failed to update like status.")
        }
        ListingAction::TogglePick => bundle.text("toast.pick_failed", "Admin pick failed."),
        ListingAction::Delete => bundle.text(
            "toast.delete_failed",
            "Failed to delete creation. Please try again.",
        ),
    }
}

/// Confirmation prompt shown before a delete proceeds.
#[must_use]
pub fn delete_confirm_message(bundle: &TranslationBundle) -> String {
    bundle.text(
        "confirm.delete",
        "Are you sure you want to delete this creation? This action cannot be undone.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{ActionGate, SessionState, authorize};
    use crate::i18n::{LocaleCode, TranslationBundle};
    use chrono::DateTime;
    use dotd_api_models::{CurrentUser, UserRole};

    fn card_owned_by(owner: &str) -> CreationCard {
        CreationCard {
            id: "c1".to_string(),
            owner_id: owner.to_string(),
            media_url: "https://cdn.example/c1.png".to_string(),
            author_name: "Mina".to_string(),
            author_avatar: None,
            prompt: "weekend picnic fit".to_string(),
            tags: vec![],
            insight: None,
            likes_count: 0,
            is_liked: false,
            is_picked: false,
            is_public: true,
            created_at: DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
        }
    }

    fn session(id: &str, role: UserRole) -> SessionState {
        SessionState::SignedIn(CurrentUser {
            id: id.to_string(),
            name: "Mina".to_string(),
            email: None,
            avatar: None,
            role,
            daily_generations_used: 0,
            max_daily_generations: 5,
        })
    }

    #[test]
    fn pick_by_non_admin_is_forbidden_before_any_remote_call() {
        let card = card_owned_by("U1");
        let rule = access_rule(ListingAction::TogglePick, &card);
        assert_eq!(
            authorize(&session("U1", UserRole::User), rule),
            ActionGate::Forbidden
        );
        assert_eq!(
            authorize(&session("A1", UserRole::Admin), rule),
            ActionGate::Allowed
        );
    }

    #[test]
    fn like_by_guest_redirects_to_login() {
        let card = card_owned_by("U1");
        let rule = access_rule(ListingAction::ToggleLike, &card);
        assert_eq!(authorize(&SessionState::Guest, rule), ActionGate::NeedsLogin);
    }

    #[test]
    fn delete_admits_owner_and_admin() {
        let card = card_owned_by("U1");
        let rule = access_rule(ListingAction::Delete, &card);
        assert_eq!(
            authorize(&session("U1", UserRole::User), rule),
            ActionGate::Allowed
        );
        assert_eq!(
            authorize(&session("U2", UserRole::User), rule),
            ActionGate::Forbidden
        );
    }

    #[test]
    fn messages_differ_per_action() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        let like = failure_message(&bundle, ListingAction::ToggleLike);
        let pick = failure_message(&bundle, ListingAction::TogglePick);
        let delete = failure_message(&bundle, ListingAction::Delete);
        assert_ne!(like, pick);
        assert_ne!(pick, delete);
        assert!(!delete_confirm_message(&bundle).is_empty());
    }
}
