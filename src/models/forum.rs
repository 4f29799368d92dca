use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::country::CountryCode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub country: CountryCode,
    pub user_id: i32,
    pub username: String,
    pub view_count: i64,
    pub post_count: i64,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A forum post. `parent_id` is set on replies; root posts carry their
/// replies nested in `replies` and only root posts count toward pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub thread_id: String,
    pub user_id: i32,
    pub username: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub likes: i64,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<ForumPost>,
}
