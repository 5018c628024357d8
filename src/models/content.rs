use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Discriminates permanent posts from time-limited stories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Story,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Story => "story",
        }
    }
}

/// A post or story as held by the store.
///
/// Author fields are a denormalized snapshot taken at creation time and
/// never refreshed. `id` and `created_at` are store-assigned; client
/// timestamps are never trusted. Counter/set pairs obey
/// `like_count == |liked_by|` and `save_count == |saved_by|` before and
/// after every engagement operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub kind: ContentKind,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Story-only soundtrack fields
    pub music_url: Option<String>,
    pub music_start_time: Option<f64>,
    pub music_end_time: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub liked_by: HashSet<Uuid>,
    pub comment_count: i64,
    pub save_count: i64,
    pub saved_by: HashSet<Uuid>,
    /// Hashtags extracted from `text` at creation; immutable afterwards
    pub tags: Vec<String>,
}

impl ContentItem {
    pub fn is_story(&self) -> bool {
        self.kind == ContentKind::Story
    }
}

/// Client-supplied fields for a new post or story.
///
/// Identity and `created_at` are assigned by the repository; validation
/// happens before anything reaches the store.
#[derive(Debug, Clone, Default)]
pub struct ContentDraft {
    pub author_id: Uuid,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub music_url: Option<String>,
    pub music_start_time: Option<f64>,
    pub music_end_time: Option<f64>,
}

/// Comment on a post, owned by its parent ContentItem.
///
/// Author fields are the same kind of creation-time snapshot as on
/// ContentItem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for a new comment
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub author_id: Uuid,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub text: String,
}
