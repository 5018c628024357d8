use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::store::ProfileDirectory;

/// Derives an online-user count from profile activity.
///
/// A point-in-time snapshot, not a live subscription; callers re-poll.
#[derive(Clone)]
pub struct PresenceService {
    profiles: Arc<dyn ProfileDirectory>,
    online_window: Duration,
}

impl PresenceService {
    pub fn new(profiles: Arc<dyn ProfileDirectory>, online_window: Duration) -> Self {
        Self {
            profiles,
            online_window,
        }
    }

    /// Number of users whose last activity falls within the online
    /// window (inclusive at the edge).
    pub async fn count_online(&self) -> Result<usize> {
        self.count_online_at(Utc::now()).await
    }

    pub async fn count_online_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now - self.online_window;
        let profiles = self.profiles.profiles().await?;
        Ok(profiles
            .iter()
            .filter(|p| p.last_seen_at >= cutoff)
            .count())
    }

    /// Best-effort activity heartbeat. Presence must never block primary
    /// flows, so store failures are logged and swallowed.
    pub async fn touch(&self, uid: Uuid) {
        match self.profiles.touch(uid, Utc::now()).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(%uid, "presence touch for unknown profile"),
            Err(err) => tracing::warn!(%uid, error = %err, "presence touch failed"),
        }
    }
}
