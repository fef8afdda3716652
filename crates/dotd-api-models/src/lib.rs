#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the DOTD API.
//!
//! The UI crate deserializes every backend response through these types so
//! the wire contract lives in one place. Field names match the JSON the
//! backend emits; identifiers stay opaque strings because the server owns
//! their format.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error document surfaced by the backend on non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    /// Human-readable diagnostic message.
    pub detail: String,
}

/// One generated outfit image plus its metadata and social counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creation {
    /// Opaque creation identifier.
    pub id: String,
    /// Identifier of the owning user.
    pub user_id: String,
    /// URL of the generated media asset.
    pub media_url: String,
    /// MIME-ish media type label (e.g. `image`).
    pub media_type: String,
    /// Prompt text the creation was generated from.
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Target gender parameter, when recorded.
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Target age group parameter, when recorded.
    pub age_group: Option<String>,
    /// Whether the creation is visible on the public feed.
    pub is_public: bool,
    /// Whether an administrator promoted this creation.
    pub is_picked_by_admin: bool,
    /// Non-negative like counter.
    pub likes_count: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Author display name, denormalized by the feed join.
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Author avatar URL, denormalized by the feed join.
    pub author_picture: Option<String>,
    #[serde(default)]
    /// Whether the requesting viewer has liked this creation. Only
    /// meaningful relative to that viewer; never cached across sessions.
    pub is_liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Style tags attached by the analysis step.
    pub tags_array: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Trend recommendation text attached by the analysis step.
    pub recommendation_text: Option<String>,
}

/// Sort key for the public feed listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Newest creations first.
    #[default]
    Latest,
    /// Most-liked creations first.
    Popular,
}

impl FeedSort {
    /// Query-string value understood by the feed endpoint.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Popular => "popular",
        }
    }
}

/// Lifecycle states of an asynchronous generation task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Accepted, not yet started.
    Pending,
    /// The generation pipeline is running.
    Processing,
    /// Finished with a result payload.
    Completed,
    /// Finished with an error.
    Failed,
}

impl TaskState {
    /// Whether this state ends the task lifecycle. Terminal tasks must not
    /// be polled again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Result payload carried by a terminal task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TaskResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// The generated creation, present on success.
    pub creation: Option<Creation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Style analysis text, present on success.
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Trend recommendation text, present on success.
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Style tags, present on success.
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Error message, present on failure.
    pub error: Option<String>,
}

/// Status snapshot returned by the task-status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSnapshot {
    /// Opaque task identifier.
    pub id: String,
    /// Current lifecycle state.
    pub status: TaskState,
    #[serde(default)]
    /// Result payload once the task is terminal.
    pub result: Option<TaskResult>,
}

/// Response of the task-creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCreated {
    /// Identifier to poll via the status endpoint.
    pub task_id: String,
}

/// Role attached to an authenticated account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Regular account.
    #[default]
    User,
    /// Administrator with curation powers.
    Admin,
}

/// Account profile returned by the who-am-I endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// Opaque user identifier (e.g. `ABC1234`).
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Contact email, when exposed.
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Avatar URL, when set.
    pub avatar: Option<String>,
    #[serde(default)]
    /// Account role used to gate admin actions.
    pub role: UserRole,
    #[serde(default)]
    /// Generations consumed today.
    pub daily_generations_used: u32,
    #[serde(default = "default_daily_limit")]
    /// Daily generation allowance.
    pub max_daily_generations: u32,
}

const fn default_daily_limit() -> u32 {
    5
}

/// Credentials accepted by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Token issued on successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_deserializes_with_optional_fields_missing() {
        let raw = r#"{
            "id": "42",
            "user_id": "ABC1234",
            "media_url": "https://cdn.example/42.png",
            "media_type": "image",
            "prompt": "rainy london street look",
            "is_public": true,
            "is_picked_by_admin": false,
            "likes_count": 5,
            "created_at": "2025-06-01T12:00:00Z"
        }"#;
        let creation: Creation = serde_json::from_str(raw).unwrap();
        assert_eq!(creation.likes_count, 5);
        assert!(!creation.is_liked);
        assert!(creation.tags_array.is_none());
        assert!(creation.author_name.is_none());
    }

    #[test]
    fn task_states_parse_lowercase_and_flag_terminal() {
        let pending: TaskState = serde_json::from_str("\"pending\"").unwrap();
        let completed: TaskState = serde_json::from_str("\"completed\"").unwrap();
        let failed: TaskState = serde_json::from_str("\"failed\"").unwrap();
        assert!(!pending.is_terminal());
        assert!(completed.is_terminal());
        assert!(failed.is_terminal());
    }

    #[test]
    fn task_snapshot_tolerates_missing_result() {
        let raw = r#"{"id": "t1", "status": "processing"}"#;
        let snapshot: TaskSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.status, TaskState::Processing);
        assert!(snapshot.result.is_none());
    }

    #[test]
    fn roles_parse_uppercase_wire_values() {
        let admin: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(admin, UserRole::Admin);
        let raw = r#"{"id": "ABC1234", "name": "Mina"}"#;
        let user: CurrentUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.max_daily_generations, 5);
    }

    #[test]
    fn feed_sort_query_values_match_endpoint_contract() {
        assert_eq!(FeedSort::Latest.as_query(), "latest");
        assert_eq!(FeedSort::Popular.as_query(), "popular");
    }
}
