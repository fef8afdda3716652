//! Shared creation models and pure listing/pagination transforms for
//! testing outside wasm.
//!
//! # Design
//! - One id-keyed card map backs every listing; grid rows, the detail
//!   modal, and the home preview all read the same `Rc<CreationCard>`.
//! - Each listing owns a [`PageCursor`]; the cursor's in-flight flag
//!   serializes fetches, and a reset bumps the cursor generation so a
//!   response from before the reset can never land in the new listing.

use crate::features::listings::mutations::MutationKind;
use chrono::{DateTime, Utc};
use dotd_api_models::{Creation, FeedSort};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Page size for the feed and my-page listings.
pub const PAGE_SIZE: usize = 10;

/// Item budget for the home admin-picked preview.
pub const PICKED_PREVIEW_LIMIT: usize = 9;

/// UI-friendly creation snapshot shared by every view of the same item.
#[derive(Clone, Debug, PartialEq)]
pub struct CreationCard {
    /// Stable creation identifier.
    pub id: String,
    /// Identifier of the owning user.
    pub owner_id: String,
    /// URL of the generated media asset.
    pub media_url: String,
    /// Author display name (`Anonymous` when the join omitted it).
    pub author_name: String,
    /// Author avatar URL, when present.
    pub author_avatar: Option<String>,
    /// Prompt text shown as the card description.
    pub prompt: String,
    /// Style tags from the analysis step.
    pub tags: Vec<String>,
    /// Trend recommendation shown in the detail view.
    pub insight: Option<String>,
    /// Non-negative like counter.
    pub likes_count: u32,
    /// Whether the current viewer liked this creation.
    pub is_liked: bool,
    /// Whether an administrator promoted this creation.
    pub is_picked: bool,
    /// Whether the creation is publicly visible.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Creation> for CreationCard {
    fn from(value: Creation) -> Self {
        Self {
            id: value.id,
            owner_id: value.user_id,
            media_url: value.media_url,
            author_name: value
                .author_name
                .unwrap_or_else(|| "Anonymous".to_string()),
            author_avatar: value.author_picture,
            prompt: value.prompt,
            tags: value.tags_array.unwrap_or_default(),
            insight: value.recommendation_text,
            likes_count: value.likes_count,
            is_liked: value.is_liked,
            is_picked: value.is_picked_by_admin,
            is_public: value.is_public,
            created_at: value.created_at,
        }
    }
}

/// Pagination cursor for one remote-backed listing.
///
/// `has_more` is false exactly when the most recent page came back shorter
/// than `limit` (or the fetch failed); once false, no further fetch starts
/// until the listing is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    /// Next fetch offset; never decreases between resets.
    pub offset: usize,
    /// Page size requested from the endpoint.
    pub limit: usize,
    /// Whether another page may exist.
    pub has_more: bool,
    /// A fetch is currently outstanding.
    pub loading: bool,
    /// Bumped on every reset; responses stamped with an older value are
    /// discarded instead of merged.
    pub generation: u64,
}

impl PageCursor {
    /// Fresh cursor for the given page size.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            offset: 0,
            limit,
            has_more: true,
            loading: false,
            generation: 0,
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::with_limit(PAGE_SIZE)
    }
}

/// Fetch parameters issued for one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// Offset to fetch at.
    pub offset: usize,
    /// Page size to request.
    pub limit: usize,
    /// Whether the response replaces the listing (first page after reset).
    pub replace: bool,
    /// Cursor generation this request was issued under.
    pub generation: u64,
}

/// One remote-backed ordered listing, unique by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    /// Visible card ids in display order.
    pub order: Vec<String>,
    /// Pagination cursor driving continuation.
    pub cursor: PageCursor,
}

impl Listing {
    const fn with_limit(limit: usize) -> Self {
        Self {
            order: Vec::new(),
            cursor: PageCursor::with_limit(limit),
        }
    }
}

/// Which listing a fetch or transform targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListingScope {
    /// Public feed under the active sort.
    Feed,
    /// Current user's creations (my page).
    Mine,
    /// Admin-picked creations (home preview).
    Picked,
}

/// Listings slice stored in the app state.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingsState {
    /// Shared card map, the single source of truth per creation id.
    pub cards: HashMap<String, Rc<CreationCard>>,
    /// Public feed listing.
    pub feed: Listing,
    /// My-page listing.
    pub mine: Listing,
    /// Home preview listing.
    pub picked: Listing,
    /// Active feed sort; changing it resets the feed listing.
    pub feed_sort: FeedSort,
    /// Card shown in the detail modal, if any.
    pub selected_id: Option<String>,
    /// In-flight mutations keyed by (creation id, kind); at most one per
    /// pair, so double-clicks cannot double-apply an optimistic delta.
    pub pending: BTreeSet<(String, MutationKind)>,
}

impl Default for ListingsState {
    fn default() -> Self {
        Self {
            cards: HashMap::new(),
            feed: Listing::with_limit(PAGE_SIZE),
            mine: Listing::with_limit(PAGE_SIZE),
            picked: Listing::with_limit(PICKED_PREVIEW_LIMIT),
            feed_sort: FeedSort::Latest,
            selected_id: None,
            pending: BTreeSet::new(),
        }
    }
}

fn listing_mut(state: &mut ListingsState, scope: ListingScope) -> &mut Listing {
    match scope {
        ListingScope::Feed => &mut state.feed,
        ListingScope::Mine => &mut state.mine,
        ListingScope::Picked => &mut state.picked,
    }
}

/// Read the listing for a scope.
#[must_use]
pub const fn listing(state: &ListingsState, scope: ListingScope) -> &Listing {
    match scope {
        ListingScope::Feed => &state.feed,
        ListingScope::Mine => &state.mine,
        ListingScope::Picked => &state.picked,
    }
}

/// Start one page fetch if the cursor allows it.
///
/// Returns `None` while a fetch is outstanding or the listing is
/// exhausted, so scroll triggers and re-renders can call this freely
/// without issuing duplicate requests.
pub fn begin_fetch(state: &mut ListingsState, scope: ListingScope) -> Option<PageRequest> {
    let cursor = &mut listing_mut(state, scope).cursor;
    if cursor.loading || !cursor.has_more {
        return None;
    }
    let request = PageRequest {
        offset: cursor.offset,
        limit: cursor.limit,
        replace: cursor.offset == 0,
        generation: cursor.generation,
    };
    cursor.loading = true;
    Some(request)
}

/// Merge a fetched page into the listing.
///
/// A response issued under an older cursor generation (the listing was
/// reset while it was on the wire) is dropped without touching the state.
/// Otherwise the response is authoritative for every card it carries,
/// except cards with a mutation currently in flight, whose optimistic
/// copy is kept until that mutation resolves.
pub fn apply_page(
    state: &mut ListingsState,
    scope: ListingScope,
    request: PageRequest,
    cards: Vec<CreationCard>,
) {
    if request.generation != listing(state, scope).cursor.generation {
        return;
    }
    let count = cards.len();
    let ids: Vec<String> = cards.iter().map(|card| card.id.clone()).collect();
    for card in cards {
        let id = card.id.clone();
        let in_flight = state.pending.iter().any(|(pending_id, _)| *pending_id == id);
        if !in_flight {
            state.cards.insert(id, Rc::new(card));
        }
    }
    let listing = listing_mut(state, scope);
    if request.replace {
        listing.order.clear();
    }
    for id in ids {
        if !listing.order.contains(&id) {
            listing.order.push(id);
        }
    }
    listing.cursor.loading = false;
    listing.cursor.has_more = count == listing.cursor.limit;
    listing.cursor.offset = request.offset + count;
}

/// Record a failed page fetch: stop further attempts, keep the prefix.
/// Failures from a superseded generation are ignored like stale pages.
pub fn page_failed(state: &mut ListingsState, scope: ListingScope, request: PageRequest) {
    let cursor = &mut listing_mut(state, scope).cursor;
    if request.generation != cursor.generation {
        return;
    }
    cursor.loading = false;
    cursor.has_more = false;
}

/// Clear a listing and rewind its cursor, keeping the configured limit.
/// Bumps the cursor generation so an in-flight fetch from before the
/// reset lands as a no-op rather than merging into the fresh listing.
pub fn reset_listing(state: &mut ListingsState, scope: ListingScope) {
    let listing = listing_mut(state, scope);
    let limit = listing.cursor.limit;
    let generation = listing.cursor.generation.wrapping_add(1);
    *listing = Listing::with_limit(limit);
    listing.cursor.generation = generation;
    prune_cards(state);
}

/// Switch the feed sort. Returns false (and does nothing) when the sort is
/// unchanged; otherwise resets the feed listing for a fresh first page.
pub fn set_feed_sort(state: &mut ListingsState, sort: FeedSort) -> bool {
    if state.feed_sort == sort {
        return false;
    }
    state.feed_sort = sort;
    reset_listing(state, ListingScope::Feed);
    true
}

/// Insert a freshly published creation at the front of a listing.
pub fn prepend_card(state: &mut ListingsState, scope: ListingScope, card: CreationCard) {
    let id = card.id.clone();
    state.cards.insert(id.clone(), Rc::new(card));
    let listing = listing_mut(state, scope);
    listing.order.retain(|existing| *existing != id);
    listing.order.insert(0, id);
}

/// Remove a card from the map and from every listing.
pub fn remove_card(state: &mut ListingsState, id: &str) {
    state.cards.remove(id);
    state.feed.order.retain(|existing| existing != id);
    state.mine.order.retain(|existing| existing != id);
    state.picked.order.retain(|existing| existing != id);
    state.pending.retain(|(pending_id, _)| pending_id != id);
    if state.selected_id.as_deref() == Some(id) {
        state.selected_id = None;
    }
}

/// Set or clear the detail-modal selection.
pub fn select_card(state: &mut ListingsState, id: Option<String>) {
    state.selected_id = id.filter(|id| state.cards.contains_key(id));
}

/// Read the cards of a listing in display order.
#[must_use]
pub fn visible_cards(state: &ListingsState, scope: ListingScope) -> Vec<Rc<CreationCard>> {
    listing(state, scope)
        .order
        .iter()
        .filter_map(|id| state.cards.get(id).cloned())
        .collect()
}

/// Read one card by id.
#[must_use]
pub fn card(state: &ListingsState, id: &str) -> Option<Rc<CreationCard>> {
    state.cards.get(id).cloned()
}

/// Read the card backing the detail modal.
#[must_use]
pub fn selected_card(state: &ListingsState) -> Option<Rc<CreationCard>> {
    let id = state.selected_id.as_deref()?;
    state.cards.get(id).cloned()
}

fn prune_cards(state: &mut ListingsState) {
    let feed = &state.feed.order;
    let mine = &state.mine.order;
    let picked = &state.picked.order;
    let selected = &state.selected_id;
    state.cards.retain(|id, _| {
        feed.contains(id)
            || mine.contains(id)
            || picked.contains(id)
            || selected.as_deref() == Some(id.as_str())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card(id: &str) -> CreationCard {
        CreationCard {
            id: id.to_string(),
            owner_id: "U1".to_string(),
            media_url: format!("https://cdn.example/{id}.png"),
            author_name: "Mina".to_string(),
            author_avatar: None,
            prompt: "rainy london street look".to_string(),
            tags: vec!["street".to_string()],
            insight: None,
            likes_count: 5,
            is_liked: false,
            is_picked: false,
            is_public: true,
            created_at: DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
        }
    }

    fn full_page(start: usize) -> Vec<CreationCard> {
        (start..start + PAGE_SIZE)
            .map(|n| sample_card(&format!("c{n}")))
            .collect()
    }

    #[test]
    fn offset_advances_by_returned_count_and_stays_monotonic() {
        let mut state = ListingsState::default();
        let first = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        assert_eq!(first.offset, 0);
        assert!(first.replace);
        apply_page(&mut state, ListingScope::Feed, first, full_page(0));
        assert_eq!(state.feed.cursor.offset, PAGE_SIZE);
        assert!(state.feed.cursor.has_more);

        let second = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        assert_eq!(second.offset, PAGE_SIZE);
        assert!(!second.replace);
        apply_page(&mut state, ListingScope::Feed, second, full_page(PAGE_SIZE));
        assert_eq!(state.feed.cursor.offset, 2 * PAGE_SIZE);
        assert_eq!(state.feed.order.len(), 2 * PAGE_SIZE);
    }

    #[test]
    fn short_page_exhausts_listing_until_reset() {
        let mut state = ListingsState::default();
        let request = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(
            &mut state,
            ListingScope::Feed,
            request,
            vec![sample_card("only")],
        );
        assert!(!state.feed.cursor.has_more);
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_none());

        reset_listing(&mut state, ListingScope::Feed);
        assert!(state.feed.cursor.has_more);
        assert_eq!(state.feed.cursor.offset, 0);
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_some());
    }

    #[test]
    fn only_one_fetch_outstanding_at_a_time() {
        let mut state = ListingsState::default();
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_some());
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_none());
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_none());
    }

    #[test]
    fn failed_fetch_keeps_loaded_prefix_and_stops_paging() {
        let mut state = ListingsState::default();
        let first = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(&mut state, ListingScope::Feed, first, full_page(0));

        let second = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        page_failed(&mut state, ListingScope::Feed, second);
        assert_eq!(second.offset, PAGE_SIZE);
        assert_eq!(state.feed.order.len(), PAGE_SIZE);
        assert!(!state.feed.cursor.has_more);
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_none());
    }

    #[test]
    fn sort_change_clears_feed_and_rewinds_cursor() {
        let mut state = ListingsState::default();
        let request = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(&mut state, ListingScope::Feed, request, full_page(0));

        assert!(set_feed_sort(&mut state, FeedSort::Popular));
        assert!(state.feed.order.is_empty());
        assert_eq!(state.feed.cursor.offset, 0);
        assert!(state.feed.cursor.has_more);

        // Same sort again is a no-op.
        assert!(!set_feed_sort(&mut state, FeedSort::Popular));
    }

    #[test]
    fn replace_page_discards_previous_order() {
        let mut state = ListingsState::default();
        let first = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(&mut state, ListingScope::Feed, first, full_page(0));
        set_feed_sort(&mut state, FeedSort::Popular);

        let fresh = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        assert!(fresh.replace);
        apply_page(
            &mut state,
            ListingScope::Feed,
            fresh,
            vec![sample_card("p0"), sample_card("p1")],
        );
        assert_eq!(state.feed.order, vec!["p0".to_string(), "p1".to_string()]);
    }

    #[test]
    fn sort_change_mid_fetch_discards_the_stale_page() {
        let mut state = ListingsState::default();
        let stale = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        assert!(set_feed_sort(&mut state, FeedSort::Popular));

        let fresh = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        assert!(fresh.replace);

        // The pre-sort response lands late: it must not merge into the new
        // listing, move the offset, or release the fresh fetch's in-flight
        // flag.
        apply_page(&mut state, ListingScope::Feed, stale, full_page(0));
        assert!(state.feed.order.is_empty());
        assert_eq!(state.feed.cursor.offset, 0);
        assert!(state.feed.cursor.loading);
        assert!(begin_fetch(&mut state, ListingScope::Feed).is_none());

        apply_page(
            &mut state,
            ListingScope::Feed,
            fresh,
            vec![sample_card("p0")],
        );
        assert_eq!(state.feed.order, vec!["p0".to_string()]);
        assert_eq!(state.feed.cursor.offset, 1);
    }

    #[test]
    fn stale_failure_does_not_halt_the_fresh_fetch() {
        let mut state = ListingsState::default();
        let stale = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        reset_listing(&mut state, ListingScope::Feed);

        let fresh = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        page_failed(&mut state, ListingScope::Feed, stale);
        assert!(state.feed.cursor.loading);
        assert!(state.feed.cursor.has_more);

        apply_page(&mut state, ListingScope::Feed, fresh, full_page(0));
        assert_eq!(state.feed.order.len(), PAGE_SIZE);
        assert!(!state.feed.cursor.loading);
    }

    #[test]
    fn duplicate_ids_stay_unique_within_a_listing() {
        let mut state = ListingsState::default();
        let first = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(&mut state, ListingScope::Feed, first, full_page(0));
        let second = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        // Server resorted; page two repeats an item from page one.
        let mut overlapping = full_page(PAGE_SIZE - 1);
        overlapping.truncate(PAGE_SIZE);
        apply_page(&mut state, ListingScope::Feed, second, overlapping);
        let unique: std::collections::HashSet<_> = state.feed.order.iter().collect();
        assert_eq!(unique.len(), state.feed.order.len());
    }

    #[test]
    fn prepend_and_remove_keep_order_consistent() {
        let mut state = ListingsState::default();
        let request = begin_fetch(&mut state, ListingScope::Feed).unwrap();
        apply_page(&mut state, ListingScope::Feed, request, full_page(0));

        prepend_card(&mut state, ListingScope::Feed, sample_card("new"));
        assert_eq!(state.feed.order.first().map(String::as_str), Some("new"));

        select_card(&mut state, Some("new".to_string()));
        remove_card(&mut state, "new");
        assert!(!state.feed.order.iter().any(|id| id == "new"));
        assert!(state.selected_id.is_none());
        assert!(card(&state, "new").is_none());
    }

    #[test]
    fn selection_requires_a_known_card() {
        let mut state = ListingsState::default();
        select_card(&mut state, Some("ghost".to_string()));
        assert!(state.selected_id.is_none());
        assert!(selected_card(&state).is_none());
    }
}
