use uuid::Uuid;

use crate::error::Result;
use crate::store::ContentStore;

/// Like/save ledger.
///
/// Every operation is a single atomic store update that changes the
/// counter and the membership set together. Adds are idempotent (a set
/// insert that reports whether it was new), removes are no-ops when the
/// user is absent, so counters can never go negative or double-count.
#[derive(Clone)]
pub struct EngagementLedger {
    store: ContentStore,
}

impl EngagementLedger {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        self.store
            .update_post(post_id, |doc| {
                if doc.item.liked_by.insert(user_id) {
                    doc.item.like_count += 1;
                } else {
                    tracing::debug!(%post_id, %user_id, "already liked; ignoring");
                }
            })
            .await
    }

    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        self.store
            .update_post(post_id, |doc| {
                if doc.item.liked_by.remove(&user_id) {
                    doc.item.like_count -= 1;
                } else {
                    tracing::debug!(%post_id, %user_id, "not liked; ignoring unlike");
                }
            })
            .await
    }

    pub async fn save(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        self.store
            .update_post(post_id, |doc| {
                if doc.item.saved_by.insert(user_id) {
                    doc.item.save_count += 1;
                }
            })
            .await
    }

    pub async fn unsave(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        self.store
            .update_post(post_id, |doc| {
                if doc.item.saved_by.remove(&user_id) {
                    doc.item.save_count -= 1;
                }
            })
            .await
    }
}
