use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentDraft, ContentDraft, ContentItem, ContentKind};
use crate::services::tags::extract_hashtags;
use crate::store::{ContentStore, ProfileDirectory};

/// Repository for posts, stories and their comments.
///
/// Validates drafts before anything reaches the store, stamps
/// `created_at` with store time (never client time), and enforces
/// author-or-admin authorization on delete.
#[derive(Clone)]
pub struct ContentRepository {
    store: ContentStore,
    profiles: Arc<dyn ProfileDirectory>,
}

impl ContentRepository {
    pub fn new(store: ContentStore, profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { store, profiles }
    }

    /// Create a post. Requires at least one of text/image/video.
    pub async fn create_post(&self, draft: ContentDraft) -> Result<ContentItem> {
        self.create(draft, ContentKind::Post).await
    }

    /// Create a story. Additionally requires image or video; the only
    /// kind allowed to carry a soundtrack.
    pub async fn create_story(&self, draft: ContentDraft) -> Result<ContentItem> {
        self.create(draft, ContentKind::Story).await
    }

    async fn create(&self, draft: ContentDraft, kind: ContentKind) -> Result<ContentItem> {
        validate_draft(&draft, kind)?;

        let tags = draft
            .text
            .as_deref()
            .map(extract_hashtags)
            .unwrap_or_default();

        let item = ContentItem {
            // id and created_at are assigned by the store on insert
            id: Uuid::nil(),
            author_id: draft.author_id,
            author_display_name: draft.author_display_name,
            author_photo_url: draft.author_photo_url,
            kind,
            text: trimmed(draft.text),
            image_url: trimmed(draft.image_url),
            video_url: trimmed(draft.video_url),
            music_url: trimmed(draft.music_url),
            music_start_time: draft.music_start_time,
            music_end_time: draft.music_end_time,
            created_at: chrono::DateTime::UNIX_EPOCH,
            like_count: 0,
            liked_by: HashSet::new(),
            comment_count: 0,
            save_count: 0,
            saved_by: HashSet::new(),
            tags,
        };

        let item = self.store.insert_post(item).await?;
        tracing::debug!(id = %item.id, kind = kind.as_str(), "created content item");
        Ok(item)
    }

    pub async fn get(&self, id: Uuid) -> Result<ContentItem> {
        self.store
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {} does not exist", id)))
    }

    /// Most recent content first, ties broken by id.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<ContentItem>> {
        self.store.list_posts(limit.clamp(1, 200)).await
    }

    /// Delete an item and all of its comments. Only the author or an
    /// administrator may delete; the removal is transactional, so a
    /// parent without comments (or the reverse) is never observable.
    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<()> {
        let item = self.get(id).await?;

        if item.author_id != requester_id {
            let is_admin = self
                .profiles
                .profile(requester_id)
                .await?
                .map(|p| p.is_admin)
                .unwrap_or(false);
            if !is_admin {
                return Err(AppError::Authorization(format!(
                    "user {} may not delete post {}",
                    requester_id, id
                )));
            }
        }

        let removed = self.store.remove_post(id).await?;
        tracing::info!(
            id = %id,
            requester = %requester_id,
            comments_removed = removed.comments.len(),
            "deleted content item"
        );
        Ok(())
    }

    /// Add a comment; the parent's comment_count is incremented in the
    /// same atomic store write.
    pub async fn add_comment(&self, post_id: Uuid, draft: CommentDraft) -> Result<Comment> {
        if draft.text.trim().is_empty() {
            return Err(AppError::validation("comment text must not be empty"));
        }

        let comment = Comment {
            id: Uuid::nil(),
            post_id,
            author_id: draft.author_id,
            author_display_name: draft.author_display_name,
            author_photo_url: draft.author_photo_url,
            text: draft.text,
            created_at: chrono::DateTime::UNIX_EPOCH,
        };
        self.store.append_comment(post_id, comment).await
    }

    /// Comments in conversation order (oldest first).
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.store.list_comments(post_id).await
    }
}

fn validate_draft(draft: &ContentDraft, kind: ContentKind) -> Result<()> {
    let has_text = non_empty(draft.text.as_deref());
    let has_image = non_empty(draft.image_url.as_deref());
    let has_video = non_empty(draft.video_url.as_deref());

    if !has_text && !has_image && !has_video {
        return Err(AppError::validation(
            "content requires text, an image or a video",
        ));
    }

    match kind {
        ContentKind::Story => {
            if !has_image && !has_video {
                return Err(AppError::validation("a story requires an image or a video"));
            }
            if let Some(start) = draft.music_start_time {
                if start < 0.0 {
                    return Err(AppError::validation("music start time must be >= 0"));
                }
            }
            if let (Some(start), Some(end)) = (draft.music_start_time, draft.music_end_time) {
                if end <= start {
                    return Err(AppError::validation(
                        "music end time must be after start time",
                    ));
                }
            }
        }
        ContentKind::Post => {
            if non_empty(draft.music_url.as_deref())
                || draft.music_start_time.is_some()
                || draft.music_end_time.is_some()
            {
                return Err(AppError::validation("music fields are story-only"));
            }
        }
    }
    Ok(())
}

fn non_empty(field: Option<&str>) -> bool {
    field.map(|s| !s.trim().is_empty()).unwrap_or(false)
}

fn trimmed(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: Option<&str>, image: Option<&str>) -> ContentDraft {
        ContentDraft {
            author_id: Uuid::new_v4(),
            author_display_name: "alice".to_string(),
            text: text.map(String::from),
            image_url: image.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn empty_draft_is_rejected() {
        let err = validate_draft(&draft(None, None), ContentKind::Post).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn whitespace_only_text_counts_as_missing() {
        let err = validate_draft(&draft(Some("   "), None), ContentKind::Post).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn text_only_story_is_rejected() {
        let err = validate_draft(&draft(Some("hi"), None), ContentKind::Story).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn story_music_window_must_be_ordered() {
        let mut d = draft(None, Some("https://cdn/img.jpg"));
        d.music_url = Some("https://cdn/track.mp3".to_string());
        d.music_start_time = Some(10.0);
        d.music_end_time = Some(5.0);
        let err = validate_draft(&d, ContentKind::Story).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        d.music_end_time = Some(25.0);
        assert!(validate_draft(&d, ContentKind::Story).is_ok());
    }

    #[test]
    fn posts_may_not_carry_music() {
        let mut d = draft(Some("hi"), None);
        d.music_url = Some("https://cdn/track.mp3".to_string());
        let err = validate_draft(&d, ContentKind::Post).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
