/// Content Core Library
///
/// The feed and engagement consistency layer of the content platform:
/// aggregates permanent posts and time-limited stories out of a single
/// document store, maintains atomic engagement counters, merges the two
/// live notification channels into one deduplicated view, and derives an
/// online-user count from profile activity.
///
/// # Modules
///
/// - `models`: Data structures for content items, comments, notifications
/// - `store`: In-process document store with atomic updates and live queries
/// - `repository`: Content and engagement persistence layers
/// - `services`: Feed assembly, story grouping, notification merging, presence
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use store::ContentStore;
