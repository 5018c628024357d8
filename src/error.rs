/// Error types for content-core
///
/// Validation, authorization and not-found errors are surfaced
/// synchronously so callers can show actionable feedback. Data-quality
/// anomalies (malformed timestamps, cross-channel id collisions) are
/// logged where they are detected and never raised as errors.
use thiserror::Error;

/// Result type alias for content-core operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected before any write reached the store
    #[error("validation error: {0}")]
    Validation(String),

    /// Requester is neither the item's author nor an administrator
    #[error("authorization error: {0}")]
    Authorization(String),

    /// Operating on an item that does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Backing store cannot be reached
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}
