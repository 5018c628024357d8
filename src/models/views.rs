//! Rendering-layer projections.
//!
//! Whenever a content item or notification crosses from the repository
//! layer toward a rendering layer, `created_at` is serialized as an
//! ISO-8601 string; the store keeps native timestamps internally.

use serde::Serialize;
use uuid::Uuid;

use super::content::{Comment, ContentItem, ContentKind};
use super::notification::Notification;

#[derive(Debug, Clone, Serialize)]
pub struct ContentItemView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub kind: ContentKind,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub music_url: Option<String>,
    pub music_start_time: Option<f64>,
    pub music_end_time: Option<f64>,
    pub created_at: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub save_count: i64,
    pub tags: Vec<String>,
}

impl From<&ContentItem> for ContentItemView {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            author_id: item.author_id,
            author_display_name: item.author_display_name.clone(),
            author_photo_url: item.author_photo_url.clone(),
            kind: item.kind,
            text: item.text.clone(),
            image_url: item.image_url.clone(),
            video_url: item.video_url.clone(),
            music_url: item.music_url.clone(),
            music_start_time: item.music_start_time,
            music_end_time: item.music_end_time,
            created_at: item.created_at.to_rfc3339(),
            like_count: item.like_count,
            comment_count: item.comment_count,
            save_count: item.save_count,
            tags: item.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub text: String,
    pub created_at: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_display_name: comment.author_display_name.clone(),
            author_photo_url: comment.author_photo_url.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub message: String,
    pub sender_id: Uuid,
    pub created_at: String,
    pub is_global: bool,
    pub target_user_id: Option<Uuid>,
    pub is_read: Option<bool>,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        use super::notification::NotificationAudience;
        let (target_user_id, is_read) = match n.audience {
            NotificationAudience::Global => (None, None),
            NotificationAudience::Targeted {
                target_user_id,
                is_read,
            } => (Some(target_user_id), Some(is_read)),
        };
        Self {
            id: n.id,
            message: n.message.clone(),
            sender_id: n.sender_id,
            created_at: n.created_at.to_rfc3339(),
            is_global: n.is_global(),
            target_user_id,
            is_read,
        }
    }
}
