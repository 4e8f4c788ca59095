//! Trace-relative time normalization.

use chrono::{DateTime, Utc};

use crate::models::Observation;

/// Rounds a value to two decimal places.
///
/// Values that round to zero come back as positive zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Returns the seconds elapsed from `reference` to `timestamp`, rounded to two decimals.
///
/// Timestamps before the reference yield negative values.
#[must_use]
pub fn elapsed_seconds(timestamp: DateTime<Utc>, reference: DateTime<Utc>) -> f64 {
    // Millisecond counts stay far below 2^52 for any realistic trace.
    #[allow(clippy::cast_precision_loss)]
    let millis = (timestamp - reference).num_milliseconds() as f64;
    round2(millis / 1000.0)
}

/// Returns the `(start, end)` offsets of an observation relative to `reference`.
///
/// An observation without an end time yields `(0.0, 0.0)`.
#[must_use]
pub fn offsets(observation: &Observation, reference: DateTime<Utc>) -> (f64, f64) {
    match observation.end_time {
        Some(end) => (
            elapsed_seconds(observation.start_time, reference),
            elapsed_seconds(end, reference),
        ),
        None => (0.0, 0.0),
    }
}

/// Converts a latency in milliseconds to seconds with two decimals.
///
/// The millisecond value is rounded to a whole number first.
#[must_use]
pub fn latency_seconds(latency_ms: f64) -> f64 {
    round2(latency_ms.round() / 1000.0)
}
