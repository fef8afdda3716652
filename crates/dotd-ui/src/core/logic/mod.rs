//! Pure request-path builders extracted for non-wasm testing.

use dotd_api_models::FeedSort;

/// Build the public feed path for one page fetch.
#[must_use]
pub fn build_feed_path(sort: FeedSort, limit: usize, offset: usize) -> String {
    format!(
        "/api/creations/feed?sort_by={}&limit={limit}&offset={offset}",
        sort.as_query()
    )
}

/// Build the current user's creations path for one page fetch.
#[must_use]
pub fn build_my_creations_path(limit: usize, offset: usize) -> String {
    format!("/api/users/me/creations?limit={limit}&offset={offset}")
}

/// Build the admin-picked listing path for the home preview.
#[must_use]
pub fn build_picked_path(limit: usize) -> String {
    format!("/api/creations/picked?limit={limit}")
}

/// Build the like/unlike path for a creation.
#[must_use]
pub fn build_like_path(creation_id: &str) -> String {
    format!("/api/creations/{}/like", urlencoding::encode(creation_id))
}

/// Build the admin pick-toggle path for a creation.
#[must_use]
pub fn build_pick_path(creation_id: &str) -> String {
    format!(
        "/api/admin/creations/{}/pick",
        urlencoding::encode(creation_id)
    )
}

/// Build the delete path for a creation.
#[must_use]
pub fn build_creation_path(creation_id: &str) -> String {
    format!("/api/creations/{}", urlencoding::encode(creation_id))
}

/// Build the status path for a generation task.
#[must_use]
pub fn build_task_status_path(task_id: &str) -> String {
    format!("/api/task_status/{}", urlencoding::encode(task_id))
}
