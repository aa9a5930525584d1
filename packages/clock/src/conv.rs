//! Conversions between [`DurationSinceUnixEpoch`] and human-readable time
//! representations, used by the status HTML glue and log statements.
use chrono::{DateTime, Utc};
use swarmcast_primitives::DurationSinceUnixEpoch;

/// Converts a Unix timestamp (as a duration since the epoch) to a UTC
/// `DateTime`.
///
/// # Panics
///
/// Panics if the timestamp cannot be represented as a `DateTime<Utc>`
/// (outside the range supported by `chrono`).
#[must_use]
pub fn convert_from_timestamp_to_datetime_utc(timestamp: DurationSinceUnixEpoch) -> DateTime<Utc> {
    #[allow(clippy::cast_possible_wrap)]
    DateTime::from_timestamp(timestamp.as_secs() as i64, timestamp.subsec_nanos())
        .expect("a duration since the Unix epoch should always convert to a valid DateTime<Utc>")
}
