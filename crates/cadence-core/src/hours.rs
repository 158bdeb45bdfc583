//! Numeric helpers for converting between fractional hours and durations.

use chrono::Duration;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Converts fractional hours to a millisecond-precision duration.
#[must_use]
pub fn hours_to_duration(hours: f64) -> Duration {
    #[allow(clippy::cast_possible_truncation)]
    let millis = (hours * MILLIS_PER_HOUR).round() as i64;
    Duration::milliseconds(millis)
}

/// Converts a duration to fractional hours.
#[must_use]
pub fn duration_to_hours(duration: Duration) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let millis = duration.num_milliseconds() as f64;
    millis / MILLIS_PER_HOUR
}

/// Formats fractional hours as a compact figure ("45m", "2h 5m").
///
/// Convenience for callers that want a single human-readable number; full
/// report rendering is out of scope for the engine.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let total_minutes = ((hours * 60.0).round() as i64).max(0);
    let h = total_minutes / 60;
    let m = total_minutes % 60;
    if h > 0 {
        format!("{h}h {m}m")
    } else {
        format!("{m}m")
    }
}
