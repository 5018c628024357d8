/// Notification aggregation
///
/// Merges the two independent live notification queries (global
/// announcements and user-targeted messages) into one deduplicated,
/// time-ordered view. Each half is an independent producer task feeding
/// a single consumer over a channel; the consumer owns the id-keyed map
/// and re-derives the visible list after every batch.
///
/// One half failing degrades delivery to the other half, never tears
/// down the whole subscription. The registry keeps at most one live
/// handle per user and fully unsubscribes a predecessor before a
/// replacement is established, so stale listeners cannot double-deliver.
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Notification, NotificationAudience};
use crate::services::timestamps;
use crate::store::{ContentStore, NotificationChannel};

/// Which of the two sub-subscriptions an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelHalf {
    Global,
    Targeted,
}

impl ChannelHalf {
    fn index(self) -> usize {
        match self {
            ChannelHalf::Global => 0,
            ChannelHalf::Targeted => 1,
        }
    }
}

/// Lifecycle of one sub-subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Subscribing,
    Active,
    /// Upstream failed or disconnected; the other half keeps delivering
    Error,
    Closed,
}

enum FeedEvent {
    Batch(ChannelHalf, Vec<Value>),
    Down(ChannelHalf),
}

#[derive(Debug)]
struct HandleInner {
    tasks: Mutex<Vec<JoinHandle<()>>>,
    states: Arc<Mutex<[ChannelState; 2]>>,
}

/// Teardown handle for one merged subscription. Cheap to clone; the
/// registry and the caller share the same inner.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    inner: Arc<HandleInner>,
}

impl SubscriptionHandle {
    /// Stop both sub-subscriptions. Calling twice is a no-op.
    pub fn unsubscribe(&self) {
        let tasks: Vec<JoinHandle<()>> = {
            let mut guard = self.inner.tasks.lock().expect("task mutex poisoned");
            guard.drain(..).collect()
        };
        if tasks.is_empty() {
            return;
        }
        for task in tasks {
            task.abort();
        }
        let mut states = self.inner.states.lock().expect("state mutex poisoned");
        *states = [ChannelState::Closed; 2];
        tracing::debug!("notification subscription closed");
    }

    pub fn channel_state(&self, half: ChannelHalf) -> ChannelState {
        self.inner.states.lock().expect("state mutex poisoned")[half.index()]
    }
}

/// One user's merged notification stream.
#[derive(Debug)]
pub struct NotificationSubscription {
    receiver: watch::Receiver<Vec<Notification>>,
    handle: SubscriptionHandle,
}

impl NotificationSubscription {
    /// Current visible list, newest first.
    pub fn current(&self) -> Vec<Notification> {
        self.receiver.borrow().clone()
    }

    /// Watch receiver for update notifications.
    pub fn updates(&self) -> watch::Receiver<Vec<Notification>> {
        self.receiver.clone()
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    pub fn unsubscribe(&self) {
        self.handle.unsubscribe();
    }

    pub fn channel_state(&self, half: ChannelHalf) -> ChannelState {
        self.handle.channel_state(half)
    }
}

pub struct NotificationAggregator {
    store: ContentStore,
    fetch_limit: usize,
    active: DashMap<Uuid, SubscriptionHandle>,
}

impl NotificationAggregator {
    pub fn new(store: ContentStore, fetch_limit: usize) -> Self {
        Self {
            store,
            fetch_limit,
            active: DashMap::new(),
        }
    }

    /// Subscribe a user to the merged global + targeted stream.
    ///
    /// Any previous subscription for the same user is fully torn down
    /// first. Fails only when neither channel can be established.
    pub async fn subscribe(&self, user_id: Uuid) -> Result<NotificationSubscription> {
        if let Some((_, previous)) = self.active.remove(&user_id) {
            previous.unsubscribe();
            tracing::debug!(%user_id, "tore down previous notification subscription");
        }

        let states = Arc::new(Mutex::new([ChannelState::Subscribing; 2]));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut tasks: Vec<JoinHandle<()>> = Vec::new();
        let mut established = 0usize;

        let halves = [
            (ChannelHalf::Global, NotificationChannel::Global),
            (ChannelHalf::Targeted, NotificationChannel::Targeted(user_id)),
        ];
        for (half, channel) in halves {
            match self
                .store
                .subscribe_notifications(channel, self.fetch_limit)
                .await
            {
                Ok((initial, rx)) => {
                    tasks.push(spawn_producer(half, initial, rx, event_tx.clone()));
                    established += 1;
                }
                Err(err) => {
                    set_state(&states, half, ChannelState::Error);
                    tracing::warn!(%user_id, half = ?half, error = %err, "notification channel failed to subscribe");
                }
            }
        }
        drop(event_tx);

        if established == 0 {
            return Err(AppError::StoreUnavailable(
                "no notification channel could be established".to_string(),
            ));
        }

        let (watch_tx, watch_rx) = watch::channel(Vec::new());
        tasks.push(spawn_consumer(event_rx, watch_tx, states.clone()));

        let handle = SubscriptionHandle {
            inner: Arc::new(HandleInner {
                tasks: Mutex::new(tasks),
                states,
            }),
        };
        self.active.insert(user_id, handle.clone());
        tracing::debug!(%user_id, "notification subscription established");

        Ok(NotificationSubscription {
            receiver: watch_rx,
            handle,
        })
    }
}

fn spawn_producer(
    half: ChannelHalf,
    initial: Vec<Value>,
    mut rx: mpsc::UnboundedReceiver<Vec<Value>>,
    tx: mpsc::UnboundedSender<FeedEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tx.send(FeedEvent::Batch(half, initial)).is_err() {
            return;
        }
        while let Some(batch) = rx.recv().await {
            if tx.send(FeedEvent::Batch(half, batch)).is_err() {
                return;
            }
        }
        // upstream closed the live query
        let _ = tx.send(FeedEvent::Down(half));
    })
}

fn spawn_consumer(
    mut rx: mpsc::UnboundedReceiver<FeedEvent>,
    watch_tx: watch::Sender<Vec<Notification>>,
    states: Arc<Mutex<[ChannelState; 2]>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut merged: HashMap<Uuid, Notification> = HashMap::new();
        while let Some(event) = rx.recv().await {
            match event {
                FeedEvent::Batch(half, docs) => {
                    mark_active(&states, half);
                    for doc in &docs {
                        match parse_notification(doc) {
                            Ok(notification) => {
                                let id = notification.id;
                                let replaced = merged.insert(id, notification);
                                if let Some(previous) = replaced {
                                    if previous.is_global() != merged[&id].is_global() {
                                        // should never appear on both channels
                                        // in a well-formed store; last write wins
                                        tracing::warn!(%id, "notification id seen on both channels");
                                    }
                                }
                            }
                            Err(reason) => {
                                tracing::warn!(%reason, "skipping malformed notification document");
                            }
                        }
                    }
                    let _ = watch_tx.send(derive_view(&merged));
                }
                FeedEvent::Down(half) => {
                    set_state(&states, half, ChannelState::Error);
                    tracing::warn!(half = ?half, "notification channel went down; degrading to remaining channel");
                }
            }
        }
    })
}

fn mark_active(states: &Arc<Mutex<[ChannelState; 2]>>, half: ChannelHalf) {
    let mut guard = states.lock().expect("state mutex poisoned");
    if guard[half.index()] == ChannelState::Subscribing {
        guard[half.index()] = ChannelState::Active;
    }
}

fn set_state(states: &Arc<Mutex<[ChannelState; 2]>>, half: ChannelHalf, state: ChannelState) {
    states.lock().expect("state mutex poisoned")[half.index()] = state;
}

/// Visible list: newest first, id tiebreak for determinism.
fn derive_view(merged: &HashMap<Uuid, Notification>) -> Vec<Notification> {
    let mut view: Vec<Notification> = merged.values().cloned().collect();
    view.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    view
}

/// Parse one raw notification document. The error is the anomaly reason
/// logged by the consumer; a bad document is skipped, never fatal.
fn parse_notification(doc: &Value) -> std::result::Result<Notification, String> {
    let id = doc
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or("missing or invalid id")?;
    let sender_id = doc
        .get("sender_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or("missing or invalid sender_id")?;
    let message = doc
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let created_at = doc.get("created_at").ok_or("missing created_at")?;
    let created_at =
        timestamps::coerce(created_at).map_err(|err| format!("created_at: {}", err))?;

    let audience = if doc.get("is_global").and_then(Value::as_bool).unwrap_or(false) {
        NotificationAudience::Global
    } else {
        let target_user_id = doc
            .get("target_user_id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or("targeted notification without target_user_id")?;
        let is_read = doc.get("is_read").and_then(Value::as_bool).unwrap_or(false);
        NotificationAudience::Targeted {
            target_user_id,
            is_read,
        }
    };

    Ok(Notification {
        id,
        message,
        sender_id,
        created_at,
        audience,
    })
}
