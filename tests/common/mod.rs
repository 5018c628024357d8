#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::{Arc, Once};
use uuid::Uuid;

use content_core::models::{CommentDraft, ContentDraft, UserProfile};
use content_core::repository::{ContentRepository, EngagementLedger};
use content_core::store::ContentStore;

static INIT_TRACING: Once = Once::new();

/// Install the test log subscriber once per test binary; anomaly logs
/// become visible under RUST_LOG=content_core=debug.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn store() -> ContentStore {
    init_tracing();
    ContentStore::new()
}

pub fn repository(store: &ContentStore) -> ContentRepository {
    ContentRepository::new(store.clone(), Arc::new(store.clone()))
}

pub fn ledger(store: &ContentStore) -> EngagementLedger {
    EngagementLedger::new(store.clone())
}

pub fn post_draft(author_id: Uuid, text: &str) -> ContentDraft {
    ContentDraft {
        author_id,
        author_display_name: "alice".to_string(),
        text: Some(text.to_string()),
        ..Default::default()
    }
}

pub fn story_draft(author_id: Uuid, name: &str) -> ContentDraft {
    ContentDraft {
        author_id,
        author_display_name: name.to_string(),
        image_url: Some("https://cdn.example/story.jpg".to_string()),
        ..Default::default()
    }
}

pub fn comment_draft(author_id: Uuid, text: &str) -> CommentDraft {
    CommentDraft {
        author_id,
        author_display_name: "bob".to_string(),
        author_photo_url: None,
        text: text.to_string(),
    }
}

pub fn profile(uid: Uuid, last_seen_at: DateTime<Utc>, is_admin: bool) -> UserProfile {
    UserProfile {
        uid,
        display_name: "someone".to_string(),
        photo_url: None,
        last_seen_at,
        is_admin,
    }
}
