use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::ContentItem;
use crate::repository::ContentRepository;

/// One load/refresh cycle worth of content, already partitioned.
/// Both lists are newest-first with id tiebreaks.
#[derive(Debug, Clone)]
pub struct Feed {
    pub posts: Vec<ContentItem>,
    pub stories: Vec<ContentItem>,
}

/// Fetches recent content and splits it into permanent posts and
/// still-active stories.
///
/// Story filtering is view-time only: an expired story is simply not
/// returned, never deleted here. Physical cleanup is an explicit owner
/// or admin action elsewhere.
#[derive(Clone)]
pub struct FeedAggregator {
    repository: ContentRepository,
    visibility_window: Duration,
}

impl FeedAggregator {
    pub fn new(repository: ContentRepository, visibility_window: Duration) -> Self {
        Self {
            repository,
            visibility_window,
        }
    }

    pub async fn load_feed(&self, limit: usize) -> Result<Feed> {
        self.load_feed_at(limit, Utc::now()).await
    }

    /// Same as `load_feed` with an explicit "now", which is what the
    /// visibility boundary is measured against.
    pub async fn load_feed_at(&self, limit: usize, now: DateTime<Utc>) -> Result<Feed> {
        let items = self.repository.list_recent(limit).await?;
        let feed = partition(items, now, self.visibility_window);
        tracing::debug!(
            posts = feed.posts.len(),
            stories = feed.stories.len(),
            "assembled feed"
        );
        Ok(feed)
    }
}

/// A story is active while `now - created_at < window` (strict).
fn story_active(item: &ContentItem, now: DateTime<Utc>, window: Duration) -> bool {
    now - item.created_at < window
}

fn partition(items: Vec<ContentItem>, now: DateTime<Utc>, window: Duration) -> Feed {
    let mut posts = Vec::new();
    let mut stories = Vec::new();
    for item in items {
        if item.is_story() {
            if story_active(&item, now, window) {
                stories.push(item);
            }
        } else {
            posts.push(item);
        }
    }
    // input is already created_at-descending; partition preserves it
    Feed { posts, stories }
}
