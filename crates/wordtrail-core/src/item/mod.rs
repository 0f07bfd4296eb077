//! Item module - Core types and data structures
//!
//! Implements the vocabulary data model:
//! - Learning items with FSRS scheduling state
//! - Category taxonomy (8 consolidated categories)
//! - Mastery tracking (3-correct-sessions rule)

mod record;

pub use record::{CaptureInput, Category, LearningItem, MasteryStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// VOCABULARY STATISTICS
// ============================================================================

/// Statistics about one user's vocabulary
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    /// Total number of captured items
    pub total_items: i64,
    /// Items currently due for review
    pub items_due_for_review: i64,
    /// Items still in the learning stage
    pub learning: i64,
    /// Items recalled correctly in 1-2 distinct sessions
    pub learned: i64,
    /// Items recalled correctly in 3+ distinct sessions
    pub ready_to_use: i64,
    /// Average memory stability in days
    pub average_stability: f64,
    /// Timestamp of the oldest capture
    pub oldest_capture: Option<DateTime<Utc>>,
    /// Timestamp of the newest capture
    pub newest_capture: Option<DateTime<Utc>>,
}

impl Default for VocabularyStats {
    fn default() -> Self {
        Self {
            total_items: 0,
            items_due_for_review: 0,
            learning: 0,
            learned: 0,
            ready_to_use: 0,
            average_stability: 0.0,
            oldest_capture: None,
            newest_capture: None,
        }
    }
}
