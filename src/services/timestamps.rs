//! Timestamp coercion
//!
//! Inbound notification documents carry `created_at` in one of a closed
//! set of shapes: a native instant, an ISO-8601 string, an epoch
//! milliseconds number, or a `{seconds, nanos}` pair. Everything is
//! normalized to one canonical `DateTime<Utc>`; callers decide whether
//! an unparseable value is skipped or propagated.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TimestampParseError {
    #[error("unrecognized timestamp shape: {0}")]
    UnrecognizedShape(String),

    #[error("timestamp out of range")]
    OutOfRange,
}

/// The recognized wire shapes, in untagged precedence order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimestampValue {
    /// Native instant / ISO-8601 string (chrono's serde form)
    Instant(DateTime<Utc>),
    /// `{seconds, nanos}` pair
    SecondsNanos {
        seconds: i64,
        #[serde(alias = "nanoseconds")]
        nanos: u32,
    },
    /// Epoch milliseconds: what an object with a to-instant conversion
    /// method serializes down to once it crosses the wire as JSON
    EpochMillis(i64),
}

/// Normalize a raw `created_at` value to a canonical instant.
pub fn coerce(value: &Value) -> Result<DateTime<Utc>, TimestampParseError> {
    let parsed: TimestampValue = serde_json::from_value(value.clone())
        .map_err(|_| TimestampParseError::UnrecognizedShape(value.to_string()))?;
    match parsed {
        TimestampValue::Instant(at) => Ok(at),
        TimestampValue::SecondsNanos { seconds, nanos } => {
            DateTime::from_timestamp(seconds, nanos).ok_or(TimestampParseError::OutOfRange)
        }
        TimestampValue::EpochMillis(millis) => {
            DateTime::from_timestamp_millis(millis).ok_or(TimestampParseError::OutOfRange)
        }
    }
}
