//! Retention Model
//!
//! Pure functions computing recall probability from elapsed time and
//! stability. No dependencies on scheduling state or storage.

use chrono::{DateTime, Utc};

/// Target recall probability; an item is due once retrievability falls below this
pub const DESIRED_RETENTION: f64 = 0.9;

/// Floor for stability after a lapse (days)
pub const MIN_STABILITY: f64 = 0.1;

/// Lower bound for item difficulty
pub const MIN_DIFFICULTY: f64 = 0.0;

/// Upper bound for item difficulty
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Probability of successful recall after `days_elapsed` days
///
/// `R(t) = (1 + t / (9 * S))^-1`
///
/// Monotonically decreasing in `days_elapsed`, equals exactly 0.9 when
/// `days_elapsed == stability` (the defining property of stability), and
/// approaches 0 as elapsed time grows. Non-positive elapsed time means the
/// item was just seen: recall is certain.
pub fn retrievability(stability: f64, days_elapsed: f64) -> f64 {
    if days_elapsed <= 0.0 {
        return 1.0;
    }
    (1.0 + days_elapsed / (9.0 * stability)).powi(-1)
}

/// Whole days between two instants, floored
///
/// Returns 0 when `a` is absent (never-reviewed items have no elapsed time).
/// Negative when `b` precedes `a`.
pub fn days_between(a: Option<DateTime<Utc>>, b: DateTime<Utc>) -> i64 {
    match a {
        Some(a) => {
            let seconds = (b - a).num_seconds() as f64;
            (seconds / 86_400.0).floor() as i64
        }
        None => 0,
    }
}
