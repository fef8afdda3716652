//! Optimistic mutation transforms for creation cards.
//!
//! # Design
//! - A toggle flips the card in the shared map before the remote call;
//!   reverting applies the same flip again, restoring the exact prior
//!   values because only one mutation per (id, kind) may be in flight.
//! - Delete is not optimistic: an incorrect removal cannot be undone
//!   without a refetch, so the card leaves the state only on confirmed
//!   remote success.

use crate::features::listings::state::{CreationCard, ListingsState, remove_card};
use std::rc::Rc;

/// Mutation kinds tracked by the per-item in-flight guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MutationKind {
    /// Like / unlike toggle.
    Like,
    /// Admin pick toggle.
    Pick,
    /// Admin or owner delete.
    Delete,
}

/// Remote call direction resolved from the card state at toggle time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeDirection {
    /// Issue the like call.
    Like,
    /// Issue the unlike call.
    Unlike,
}

fn try_begin(state: &mut ListingsState, id: &str, kind: MutationKind) -> bool {
    if !state.cards.contains_key(id) {
        return false;
    }
    state.pending.insert((id.to_string(), kind))
}

fn finish(state: &mut ListingsState, id: &str, kind: MutationKind) {
    state.pending.remove(&(id.to_string(), kind));
}

fn flip_like(card: &CreationCard) -> CreationCard {
    let mut next = card.clone();
    if next.is_liked {
        next.is_liked = false;
        next.likes_count = next.likes_count.saturating_sub(1);
    } else {
        next.is_liked = true;
        next.likes_count += 1;
    }
    next
}

fn flip_pick(card: &CreationCard) -> CreationCard {
    let mut next = card.clone();
    next.is_picked = !next.is_picked;
    next
}

fn update_card(
    state: &mut ListingsState,
    id: &str,
    transform: impl FnOnce(&CreationCard) -> CreationCard,
) {
    if let Some(current) = state.cards.get(id) {
        let next = transform(current);
        state.cards.insert(id.to_string(), Rc::new(next));
    }
}

/// Apply a like toggle optimistically.
///
/// Derives the direction from the card's current state (never from a
/// stale snapshot) and returns the remote call to issue, or `None` when
/// the card is unknown or the same toggle is already in flight.
pub fn begin_like(state: &mut ListingsState, id: &str) -> Option<LikeDirection> {
    if !try_begin(state, id, MutationKind::Like) {
        return None;
    }
    let direction = if state.cards.get(id).is_some_and(|card| card.is_liked) {
        LikeDirection::Unlike
    } else {
        LikeDirection::Like
    };
    update_card(state, id, flip_like);
    Some(direction)
}

/// Confirm a like toggle after remote success.
pub fn finish_like(state: &mut ListingsState, id: &str) {
    finish(state, id, MutationKind::Like);
}

/// Roll back a like toggle after remote failure.
pub fn revert_like(state: &mut ListingsState, id: &str) {
    update_card(state, id, flip_like);
    finish(state, id, MutationKind::Like);
}

/// Apply an admin pick toggle optimistically. Returns false when the card
/// is unknown or the toggle is already in flight.
pub fn begin_pick(state: &mut ListingsState, id: &str) -> bool {
    if !try_begin(state, id, MutationKind::Pick) {
        return false;
    }
    update_card(state, id, flip_pick);
    true
}

/// Confirm a pick toggle after remote success.
pub fn finish_pick(state: &mut ListingsState, id: &str) {
    finish(state, id, MutationKind::Pick);
}

/// Roll back a pick toggle after remote failure.
pub fn revert_pick(state: &mut ListingsState, id: &str) {
    update_card(state, id, flip_pick);
    finish(state, id, MutationKind::Pick);
}

/// Reserve a delete slot for the card. No local change happens here; the
/// card stays visible until [`finish_delete`] confirms remote success.
pub fn begin_delete(state: &mut ListingsState, id: &str) -> bool {
    try_begin(state, id, MutationKind::Delete)
}

/// Resolve a delete: remove the card on success, keep it on failure.
pub fn finish_delete(state: &mut ListingsState, id: &str, deleted: bool) {
    finish(state, id, MutationKind::Delete);
    if deleted {
        remove_card(state, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::listings::state::{
        ListingScope, PageRequest, apply_page, begin_fetch, card, select_card, selected_card,
    };
    use chrono::DateTime;
    use std::rc::Rc;

    fn sample_card(id: &str, likes: u32, liked: bool) -> CreationCard {
        CreationCard {
            id: id.to_string(),
            owner_id: "U1".to_string(),
            media_url: format!("https://cdn.example/{id}.png"),
            author_name: "Mina".to_string(),
            author_avatar: None,
            prompt: "pastel first-date outfit".to_string(),
            tags: vec![],
            insight: None,
            likes_count: likes,
            is_liked: liked,
            is_picked: false,
            is_public: true,
            created_at: DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
        }
    }

    fn seeded(cards: Vec<CreationCard>) -> ListingsState {
        let mut state = ListingsState::default();
        let request = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(&mut state, ListingScope::Feed, request, cards);
        state
    }

    #[test]
    fn like_applies_synchronously_and_revert_restores() {
        let mut state = seeded(vec![sample_card("c1", 5, false)]);
        let direction = begin_like(&mut state, "c1").unwrap();
        assert_eq!(direction, LikeDirection::Like);
        let flipped = card(&state, "c1").unwrap();
        assert_eq!(flipped.likes_count, 6);
        assert!(flipped.is_liked);

        revert_like(&mut state, "c1");
        let restored = card(&state, "c1").unwrap();
        assert_eq!(restored.likes_count, 5);
        assert!(!restored.is_liked);
    }

    #[test]
    fn liked_card_unlikes_and_never_goes_negative() {
        let mut state = seeded(vec![sample_card("c1", 0, true)]);
        let direction = begin_like(&mut state, "c1").unwrap();
        assert_eq!(direction, LikeDirection::Unlike);
        assert_eq!(card(&state, "c1").unwrap().likes_count, 0);
    }

    #[test]
    fn duplicate_like_trigger_is_absorbed() {
        let mut state = seeded(vec![sample_card("c1", 5, false)]);
        assert!(begin_like(&mut state, "c1").is_some());
        // Double-click before the remote call resolves.
        assert!(begin_like(&mut state, "c1").is_none());
        assert_eq!(card(&state, "c1").unwrap().likes_count, 6);

        finish_like(&mut state, "c1");
        assert_eq!(begin_like(&mut state, "c1"), Some(LikeDirection::Unlike));
    }

    #[test]
    fn distinct_items_toggle_independently() {
        let mut state = seeded(vec![sample_card("c1", 1, false), sample_card("c2", 2, true)]);
        assert_eq!(begin_like(&mut state, "c1"), Some(LikeDirection::Like));
        assert_eq!(begin_like(&mut state, "c2"), Some(LikeDirection::Unlike));
        assert_eq!(card(&state, "c1").unwrap().likes_count, 2);
        assert_eq!(card(&state, "c2").unwrap().likes_count, 1);
    }

    #[test]
    fn grid_and_detail_views_share_one_copy() {
        let mut state = seeded(vec![sample_card("c1", 5, false)]);
        select_card(&mut state, Some("c1".to_string()));
        begin_like(&mut state, "c1");
        let from_grid = card(&state, "c1").unwrap();
        let from_modal = selected_card(&state).unwrap();
        assert!(Rc::ptr_eq(&from_grid, &from_modal));
        assert_eq!(from_modal.likes_count, 6);
    }

    #[test]
    fn pick_toggle_flips_and_reverts() {
        let mut state = seeded(vec![sample_card("c1", 5, false)]);
        assert!(begin_pick(&mut state, "c1"));
        assert!(card(&state, "c1").unwrap().is_picked);
        assert!(!begin_pick(&mut state, "c1"));

        revert_pick(&mut state, "c1");
        assert!(!card(&state, "c1").unwrap().is_picked);
    }

    #[test]
    fn delete_keeps_card_until_remote_success() {
        let mut state = seeded(vec![sample_card("c1", 5, false)]);
        assert!(begin_delete(&mut state, "c1"));
        assert!(card(&state, "c1").is_some());

        finish_delete(&mut state, "c1", false);
        assert!(card(&state, "c1").is_some());

        assert!(begin_delete(&mut state, "c1"));
        finish_delete(&mut state, "c1", true);
        assert!(card(&state, "c1").is_none());
        assert!(state.feed.order.is_empty());
    }

    #[test]
    fn unknown_card_rejects_every_mutation() {
        let mut state = ListingsState::default();
        assert!(begin_like(&mut state, "ghost").is_none());
        assert!(!begin_pick(&mut state, "ghost"));
        assert!(!begin_delete(&mut state, "ghost"));
        assert!(state.pending.is_empty());
    }

    #[test]
    fn fresh_page_preserves_in_flight_optimistic_copy() {
        let mut state = seeded(vec![sample_card("c1", 5, false)]);
        begin_like(&mut state, "c1");
        let request = PageRequest {
            offset: 0,
            limit: 10,
            replace: true,
            generation: 0,
        };
        // Server still reports the pre-toggle counters.
        apply_page(
            &mut state,
            ListingScope::Feed,
            request,
            vec![sample_card("c1", 5, false)],
        );
        assert_eq!(card(&state, "c1").unwrap().likes_count, 6);

        finish_like(&mut state, "c1");
        let request = PageRequest {
            offset: 0,
            limit: 10,
            replace: true,
            generation: 0,
        };
        apply_page(
            &mut state,
            ListingScope::Feed,
            request,
            vec![sample_card("c1", 6, true)],
        );
        assert_eq!(card(&state, "c1").unwrap().likes_count, 6);
        assert!(card(&state, "c1").unwrap().is_liked);
    }
}
