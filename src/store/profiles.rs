/// Seam to the external profile-management collaborator.
///
/// Presence and delete-authorization only ever need these three
/// operations; keeping them behind a trait lets the composition root
/// hand components whatever directory backs `users/{uid}`.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::UserProfile;

use super::ContentStore;

#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn profile(&self, uid: Uuid) -> Result<Option<UserProfile>>;

    async fn profiles(&self) -> Result<Vec<UserProfile>>;

    /// Refresh `last_seen_at`; returns false if the profile is absent.
    async fn touch(&self, uid: Uuid, at: DateTime<Utc>) -> Result<bool>;
}

#[async_trait]
impl ProfileDirectory for ContentStore {
    async fn profile(&self, uid: Uuid) -> Result<Option<UserProfile>> {
        self.get_profile(uid).await
    }

    async fn profiles(&self) -> Result<Vec<UserProfile>> {
        self.list_profiles().await
    }

    async fn touch(&self, uid: Uuid, at: DateTime<Utc>) -> Result<bool> {
        self.touch_profile(uid, at).await
    }
}
