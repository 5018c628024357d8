use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Who a notification is addressed to.
///
/// A notification is exactly one of global (everyone, no unread
/// tracking) or targeted (one recipient, carries an unread flag); the
/// enum makes any other combination unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "audience", rename_all = "snake_case")]
pub enum NotificationAudience {
    Global,
    Targeted { target_user_id: Uuid, is_read: bool },
}

impl NotificationAudience {
    pub fn is_global(&self) -> bool {
        matches!(self, NotificationAudience::Global)
    }

    pub fn target_user_id(&self) -> Option<Uuid> {
        match self {
            NotificationAudience::Global => None,
            NotificationAudience::Targeted { target_user_id, .. } => Some(*target_user_id),
        }
    }
}

/// A parsed, well-formed notification as delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub audience: NotificationAudience,
}

impl Notification {
    pub fn is_global(&self) -> bool {
        self.audience.is_global()
    }

    /// Render as the flat document shape the notifications collection
    /// holds (`is_global` plus an optional `target_user_id`/`is_read`
    /// pair, `created_at` as ISO-8601).
    pub fn into_document(self) -> Value {
        let mut doc = json!({
            "id": self.id.to_string(),
            "message": self.message,
            "sender_id": self.sender_id.to_string(),
            "created_at": self.created_at.to_rfc3339(),
            "is_global": self.is_global(),
        });
        if let NotificationAudience::Targeted {
            target_user_id,
            is_read,
        } = self.audience
        {
            doc["target_user_id"] = json!(target_user_id.to_string());
            doc["is_read"] = json!(is_read);
        }
        doc
    }
}
