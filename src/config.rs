/// Configuration management for content-core
///
/// Loads configuration from environment variables. Every knob has a
/// default so the crate works out of the box; invalid values fail fast.
use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Feed assembly settings
    pub feed: FeedConfig,
    /// Notification subscription settings
    pub notifications: NotificationConfig,
    /// Presence settings
    pub presence: PresenceConfig,
}

/// Feed assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Default number of content items fetched per load
    #[serde(default = "default_feed_limit")]
    pub default_limit: usize,
    /// How long a story stays visible after creation, in hours.
    /// Canonical value is 24; see DESIGN.md.
    #[serde(default = "default_story_visibility_hours")]
    pub story_visibility_hours: i64,
}

/// Notification subscription settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Most-recent-N fetch limit per channel (global / targeted)
    #[serde(default = "default_notification_fetch_limit")]
    pub fetch_limit: usize,
}

/// Presence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// A user is considered online while last_seen_at is within this window
    #[serde(default = "default_online_window_minutes")]
    pub online_window_minutes: i64,
}

// Default values
fn default_feed_limit() -> usize {
    50
}

fn default_story_visibility_hours() -> i64 {
    24
}

fn default_notification_fetch_limit() -> usize {
    20
}

fn default_online_window_minutes() -> i64 {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            feed: FeedConfig {
                default_limit: env_or("FEED_DEFAULT_LIMIT", default_feed_limit())?,
                story_visibility_hours: env_or(
                    "STORY_VISIBILITY_HOURS",
                    default_story_visibility_hours(),
                )?,
            },
            notifications: NotificationConfig {
                fetch_limit: env_or(
                    "NOTIFICATION_FETCH_LIMIT",
                    default_notification_fetch_limit(),
                )?,
            },
            presence: PresenceConfig {
                online_window_minutes: env_or(
                    "PRESENCE_ONLINE_WINDOW_MINUTES",
                    default_online_window_minutes(),
                )?,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig {
                default_limit: default_feed_limit(),
                story_visibility_hours: default_story_visibility_hours(),
            },
            notifications: NotificationConfig {
                fetch_limit: default_notification_fetch_limit(),
            },
            presence: PresenceConfig {
                online_window_minutes: default_online_window_minutes(),
            },
        }
    }
}

impl FeedConfig {
    pub fn visibility_window(&self) -> Duration {
        Duration::hours(self.story_visibility_hours)
    }
}

impl PresenceConfig {
    pub fn online_window(&self) -> Duration {
        Duration::minutes(self.online_window_minutes)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.feed.story_visibility_hours, 24);
        assert_eq!(config.presence.online_window_minutes, 5);
        assert_eq!(config.feed.visibility_window(), Duration::hours(24));
    }
}
