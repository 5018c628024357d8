use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User profile, owned by the external profile-management collaborator.
///
/// This crate reads `last_seen_at` (presence) and `is_admin` (delete
/// authorization) and refreshes `last_seen_at` via best-effort
/// heartbeats; everything else belongs to the profile service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub uid: Uuid,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub last_seen_at: DateTime<Utc>,
    pub is_admin: bool,
}
