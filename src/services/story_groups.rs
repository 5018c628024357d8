//! Story grouping for the "recent updates" rail.
//!
//! Buckets active stories by author. Inside a bucket, stories run oldest
//! first (the order a viewer watches them); the author rail runs newest
//! poster first. Both orderings are fully deterministic, with id
//! tiebreaks, so repeated grouping of the same input is identical.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::ContentItem;

/// Denormalized author projection for the rail, taken from the author's
/// latest story snapshot (identity as of that story's creation, not a
/// live profile lookup).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthorSummary {
    pub author_id: Uuid,
    pub display_name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoryGroups {
    /// Rail order: authors with the most recent story first
    pub authors: Vec<AuthorSummary>,
    /// Watch order per author: oldest story first
    pub by_author: HashMap<Uuid, Vec<ContentItem>>,
}

pub fn group_stories(stories: &[ContentItem]) -> StoryGroups {
    let mut by_author: HashMap<Uuid, Vec<ContentItem>> = HashMap::new();
    for story in stories.iter().filter(|s| s.is_story()) {
        by_author
            .entry(story.author_id)
            .or_default()
            .push(story.clone());
    }

    for bucket in by_author.values_mut() {
        bucket.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    let mut authors: Vec<AuthorSummary> = Vec::with_capacity(by_author.len());
    let mut latest: Vec<&ContentItem> = by_author
        .values()
        .map(|bucket| bucket.last().expect("buckets are never empty"))
        .collect();
    latest.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    for story in latest {
        authors.push(AuthorSummary {
            author_id: story.author_id,
            display_name: story.author_display_name.clone(),
            photo_url: story.author_photo_url.clone(),
        });
    }

    StoryGroups { authors, by_author }
}
