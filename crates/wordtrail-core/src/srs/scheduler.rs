//! Scheduler
//!
//! Turns a learner's rating into a schedule revision. `process_review` is a
//! pure function returning a [`ScheduleUpdate`] patch so the caller can apply
//! it transactionally against whatever store holds the item; the core never
//! mutates records in place.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{LearningItem, MasteryStatus};

use super::retention::{MAX_DIFFICULTY, MIN_DIFFICULTY, MIN_STABILITY};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Hard ceiling on the scheduling interval, roughly 100 years
///
/// Also bounds stored stability. Multiplicative growth compounds fast enough
/// that a long streak of correct ratings would otherwise push the due date
/// past the representable `DateTime` range.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

// ============================================================================
// RATING
// ============================================================================

/// Self-assessed recall quality on the standard 4-point scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rating {
    /// Complete failure to recall
    Again = 1,
    /// Recalled with serious difficulty
    Hard = 2,
    /// Recalled correctly
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Rating {
    /// Parse a numeric rating (1-4)
    ///
    /// Callers validate rating range before invoking the scheduler; an
    /// invalid value here is a caller contract violation.
    pub fn from_value(value: u8) -> Option<Rating> {
        match value {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    /// Whether this rating counts as a correct recall (Good or Easy)
    pub fn is_correct(&self) -> bool {
        (*self as u8) >= (Rating::Good as u8)
    }
}

// ============================================================================
// SCHEDULE UPDATE
// ============================================================================

/// Delta produced by one review
///
/// Contains every field the scheduler mutates; apply it against the stored
/// item in a single write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    /// Revised difficulty (0-10)
    pub difficulty: f64,
    /// Revised stability (days)
    pub stability: f64,
    /// Always 1.0: the item was just seen
    pub retrievability: f64,
    /// Next scheduled review
    pub next_review_due_at: DateTime<Utc>,
    /// Set to the review instant
    pub last_reviewed_at: DateTime<Utc>,
    /// Incremented review counter
    pub review_count: i32,
    /// Lapse counter (incremented only on Again)
    pub lapse_count: i32,
    /// Correct-session counter after mastery transition
    pub consecutive_correct_sessions: i32,
    /// Session credited for the last correct recall
    pub last_correct_session_id: Option<String>,
    /// Mastery label derived from the counter
    pub mastery_status: MasteryStatus,
    /// Modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl ScheduleUpdate {
    /// Apply this delta to an in-memory item
    pub fn apply(&self, item: &mut LearningItem) {
        item.difficulty = self.difficulty;
        item.stability = self.stability;
        item.retrievability = self.retrievability;
        item.next_review_due_at = self.next_review_due_at;
        item.last_reviewed_at = Some(self.last_reviewed_at);
        item.review_count = self.review_count;
        item.lapse_count = self.lapse_count;
        item.consecutive_correct_sessions = self.consecutive_correct_sessions;
        item.last_correct_session_id = self.last_correct_session_id.clone();
        item.mastery_status = self.mastery_status;
        item.updated_at = self.updated_at;
    }
}

// ============================================================================
// MASTERY
// ============================================================================

/// Mastery label for a correct-session count
///
/// 0 → Learning, 1-2 → Learned, 3+ → ReadyToUse.
pub fn mastery_for(consecutive_correct_sessions: i32) -> MasteryStatus {
    match consecutive_correct_sessions {
        0 => MasteryStatus::Learning,
        1..=2 => MasteryStatus::Learned,
        _ => MasteryStatus::ReadyToUse,
    }
}

// ============================================================================
// STABILITY / DIFFICULTY REVISION
// ============================================================================

/// Multiplicative stability growth for correct recalls
///
/// Harder items grow slower: the `(11 - D)` term tapers growth from the full
/// base factor at difficulty 0 down to a small but still > 1 factor at
/// difficulty 10, so consecutive Good ratings strictly increase stability
/// until the interval ceiling.
fn growth_factor(base: f64, difficulty: f64) -> f64 {
    1.0 + (base - 1.0) * (MAX_DIFFICULTY + 1.0 - difficulty) / 6.0
}

fn next_stability(stability: f64, difficulty: f64, rating: Rating) -> f64 {
    let revised = match rating {
        Rating::Again => (stability * 0.5).max(MIN_STABILITY),
        // Floored strictly above the Again floor so the rating ordering
        // holds even at minimum stability
        Rating::Hard => (stability * 0.98).max(MIN_STABILITY * 1.02),
        Rating::Good => stability * growth_factor(2.5, difficulty),
        Rating::Easy => stability * growth_factor(3.5, difficulty),
    };
    revised.min(MAX_INTERVAL_DAYS as f64)
}

fn next_difficulty(difficulty: f64, rating: Rating) -> f64 {
    let delta = match rating {
        Rating::Again => 1.0,
        Rating::Hard => 0.5,
        Rating::Good => 0.0,
        Rating::Easy => -0.5,
    };
    (difficulty + delta).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

// ============================================================================
// PROCESS REVIEW
// ============================================================================

/// Process one rating event
///
/// Total over all valid inputs: every `(item, rating, session_id, now)`
/// combination produces a well-defined update.
///
/// Session awareness: a correct rating only advances mastery when the session
/// differs from the one already credited; an incorrect rating (Again or Hard)
/// resets mastery entirely, even from `ready_to_use`.
pub fn process_review(
    item: &LearningItem,
    rating: Rating,
    session_id: &str,
    now: DateTime<Utc>,
) -> ScheduleUpdate {
    let stability = next_stability(item.stability, item.difficulty, rating);
    let difficulty = next_difficulty(item.difficulty, rating);

    let interval_days = (stability.round() as i64).clamp(1, MAX_INTERVAL_DAYS);

    let lapse_count = if rating == Rating::Again {
        item.lapse_count + 1
    } else {
        item.lapse_count
    };

    let (consecutive_correct_sessions, last_correct_session_id) = if rating.is_correct() {
        if item.last_correct_session_id.as_deref() == Some(session_id) {
            // Same-session repeat: never counts twice toward mastery
            (
                item.consecutive_correct_sessions,
                item.last_correct_session_id.clone(),
            )
        } else {
            (
                item.consecutive_correct_sessions + 1,
                Some(session_id.to_string()),
            )
        }
    } else {
        (0, None)
    };

    ScheduleUpdate {
        difficulty,
        stability,
        retrievability: 1.0,
        next_review_due_at: now + Duration::days(interval_days),
        last_reviewed_at: now,
        review_count: item.review_count + 1,
        lapse_count,
        consecutive_correct_sessions,
        last_correct_session_id,
        mastery_status: mastery_for(consecutive_correct_sessions),
        updated_at: now,
    }
}

// ============================================================================
// TESTS
// ============================================================================
