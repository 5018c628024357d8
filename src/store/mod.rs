/// In-process document store
///
/// The single authoritative shared resource. All counter/set mutation
/// goes through `update_post`, which applies a caller closure under the
/// collection write lock so the coupled sub-mutations commit together or
/// not at all; deletion removes a post and its comment subtree in one
/// lock section, so no orphan state is ever observable.
///
/// Notifications are held as loosely-shaped JSON documents (timestamps
/// arrive in several shapes; parsing is the subscriber's concern) and
/// fan out to live subscribers over mpsc channels. Send errors on a
/// closed channel are ignored and the dead sender is pruned.
pub mod profiles;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, ContentItem, UserProfile};

pub use profiles::ProfileDirectory;

/// A post together with its comment subtree. Keeping comments inside
/// the parent document is what makes delete-with-comments and
/// comment-plus-counter writes atomic.
#[derive(Debug, Clone)]
pub struct PostDocument {
    pub item: ContentItem,
    pub comments: Vec<Comment>,
}

/// Key for a live notification query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationChannel {
    /// Unbounded audience
    Global,
    /// Addressed to one user
    Targeted(Uuid),
}

type NotificationSender = mpsc::UnboundedSender<Vec<Value>>;

struct StoreInner {
    posts: RwLock<HashMap<Uuid, PostDocument>>,
    users: RwLock<HashMap<Uuid, UserProfile>>,
    // Lock order: notifications before subscribers.
    notifications: RwLock<Vec<Value>>,
    subscribers: RwLock<HashMap<NotificationChannel, Vec<NotificationSender>>>,
    last_stamp: Mutex<DateTime<Utc>>,
    available: AtomicBool,
}

#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<StoreInner>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                posts: RwLock::new(HashMap::new()),
                users: RwLock::new(HashMap::new()),
                notifications: RwLock::new(Vec::new()),
                subscribers: RwLock::new(HashMap::new()),
                last_stamp: Mutex::new(DateTime::UNIX_EPOCH),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Simulate the backing store dropping off the network. Reads and
    /// writes return `StoreUnavailable` while false.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.inner.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::StoreUnavailable(
                "content store is unreachable".to_string(),
            ))
        }
    }

    /// Store-assigned write timestamp, strictly monotonic so that
    /// created_at ordering never depends on client clocks.
    fn next_stamp(&self) -> DateTime<Utc> {
        let mut last = self
            .inner
            .last_stamp
            .lock()
            .expect("timestamp mutex poisoned");
        let mut now = Utc::now();
        if now <= *last {
            now = *last + Duration::microseconds(1);
        }
        *last = now;
        now
    }

    // ========== Posts ==========

    /// Insert a new post/story, assigning identity and `created_at`.
    pub async fn insert_post(&self, mut item: ContentItem) -> Result<ContentItem> {
        self.check_available()?;
        let mut posts = self.inner.posts.write().await;
        item.id = Uuid::new_v4();
        item.created_at = self.next_stamp();
        posts.insert(
            item.id,
            PostDocument {
                item: item.clone(),
                comments: Vec::new(),
            },
        );
        Ok(item)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Option<ContentItem>> {
        self.check_available()?;
        let posts = self.inner.posts.read().await;
        Ok(posts.get(&id).map(|doc| doc.item.clone()))
    }

    /// Most recent posts first; ties broken by id so pagination and
    /// refresh stay deterministic.
    pub async fn list_posts(&self, limit: usize) -> Result<Vec<ContentItem>> {
        self.check_available()?;
        let posts = self.inner.posts.read().await;
        let mut items: Vec<ContentItem> = posts.values().map(|doc| doc.item.clone()).collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        items.truncate(limit);
        Ok(items)
    }

    /// Atomic update primitive: the closure runs under the collection
    /// write lock, so coupled mutations (counter delta + set membership)
    /// commit as one.
    pub async fn update_post<F>(&self, id: Uuid, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut PostDocument),
    {
        self.check_available()?;
        let mut posts = self.inner.posts.write().await;
        let doc = posts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("post {} does not exist", id)))?;
        mutate(doc);
        Ok(())
    }

    /// Remove a post together with all of its comments.
    pub async fn remove_post(&self, id: Uuid) -> Result<PostDocument> {
        self.check_available()?;
        let mut posts = self.inner.posts.write().await;
        posts
            .remove(&id)
            .ok_or_else(|| AppError::not_found(format!("post {} does not exist", id)))
    }

    /// Append a comment and bump the parent's comment_count in one
    /// write-lock section.
    pub async fn append_comment(&self, post_id: Uuid, mut comment: Comment) -> Result<Comment> {
        self.check_available()?;
        let mut posts = self.inner.posts.write().await;
        let doc = posts
            .get_mut(&post_id)
            .ok_or_else(|| AppError::not_found(format!("post {} does not exist", post_id)))?;
        comment.id = Uuid::new_v4();
        comment.post_id = post_id;
        comment.created_at = self.next_stamp();
        doc.comments.push(comment.clone());
        doc.item.comment_count += 1;
        Ok(comment)
    }

    /// Comments oldest first (conversation order), ties broken by id.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.check_available()?;
        let posts = self.inner.posts.read().await;
        let doc = posts
            .get(&post_id)
            .ok_or_else(|| AppError::not_found(format!("post {} does not exist", post_id)))?;
        let mut comments = doc.comments.clone();
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    // ========== Notifications ==========

    /// Append a notification document and fan it out to every live
    /// subscriber whose channel matches.
    pub async fn publish_notification(&self, doc: Value) -> Result<()> {
        self.check_available()?;
        let mut notifications = self.inner.notifications.write().await;
        notifications.push(doc.clone());

        let channel = match route(&doc) {
            Some(channel) => channel,
            None => {
                tracing::warn!("notification document with malformed audience; not routed");
                return Ok(());
            }
        };

        let mut subscribers = self.inner.subscribers.write().await;
        if let Some(senders) = subscribers.get_mut(&channel) {
            senders.retain(|sender| sender.send(vec![doc.clone()]).is_ok());
        }
        Ok(())
    }

    /// Most recently written documents matching the channel, capped at
    /// `limit`.
    pub async fn latest_notifications(
        &self,
        channel: NotificationChannel,
        limit: usize,
    ) -> Result<Vec<Value>> {
        self.check_available()?;
        let notifications = self.inner.notifications.read().await;
        Ok(snapshot_matching(&notifications, channel, limit))
    }

    /// Open a live query: returns the current most-recent-N snapshot and
    /// a receiver for subsequent batches. The snapshot and the
    /// registration happen under the same lock scope, so no document
    /// published in between can be missed.
    pub async fn subscribe_notifications(
        &self,
        channel: NotificationChannel,
        limit: usize,
    ) -> Result<(Vec<Value>, mpsc::UnboundedReceiver<Vec<Value>>)> {
        self.check_available()?;
        let notifications = self.inner.notifications.read().await;
        let initial = snapshot_matching(&notifications, channel, limit);

        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.inner.subscribers.write().await;
        subscribers.entry(channel).or_default().push(tx);
        Ok((initial, rx))
    }

    /// Tear down every live subscription on one channel, as an upstream
    /// failure would. Subscribers observe their receiver closing.
    pub async fn disconnect_notification_channel(&self, channel: NotificationChannel) {
        let mut subscribers = self.inner.subscribers.write().await;
        subscribers.remove(&channel);
    }

    // ========== User profiles ==========

    pub async fn upsert_profile(&self, profile: UserProfile) -> Result<()> {
        self.check_available()?;
        let mut users = self.inner.users.write().await;
        users.insert(profile.uid, profile);
        Ok(())
    }

    pub async fn get_profile(&self, uid: Uuid) -> Result<Option<UserProfile>> {
        self.check_available()?;
        let users = self.inner.users.read().await;
        Ok(users.get(&uid).cloned())
    }

    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        self.check_available()?;
        let users = self.inner.users.read().await;
        Ok(users.values().cloned().collect())
    }

    /// Refresh `last_seen_at`. Returns false when the profile is not
    /// present (profile ownership belongs to the external collaborator).
    pub async fn touch_profile(&self, uid: Uuid, at: DateTime<Utc>) -> Result<bool> {
        self.check_available()?;
        let mut users = self.inner.users.write().await;
        match users.get_mut(&uid) {
            Some(profile) => {
                profile.last_seen_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn is_global(doc: &Value) -> bool {
    doc.get("is_global").and_then(Value::as_bool).unwrap_or(false)
}

fn target_user_id(doc: &Value) -> Option<Uuid> {
    doc.get("target_user_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

fn route(doc: &Value) -> Option<NotificationChannel> {
    if is_global(doc) {
        Some(NotificationChannel::Global)
    } else {
        target_user_id(doc).map(NotificationChannel::Targeted)
    }
}

fn snapshot_matching(
    notifications: &[Value],
    channel: NotificationChannel,
    limit: usize,
) -> Vec<Value> {
    let matching: Vec<Value> = notifications
        .iter()
        .filter(|doc| matches_channel(doc, channel))
        .cloned()
        .collect();
    let skip = matching.len().saturating_sub(limit);
    matching.into_iter().skip(skip).collect()
}

fn matches_channel(doc: &Value, channel: NotificationChannel) -> bool {
    match channel {
        NotificationChannel::Global => is_global(doc),
        NotificationChannel::Targeted(uid) => {
            !is_global(doc) && target_user_id(doc) == Some(uid)
        }
    }
}
