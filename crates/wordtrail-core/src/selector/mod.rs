//! Due-Set Selector
//!
//! Pull-based due-date evaluation: callers pass `now` and get back the items
//! eligible for review right now. New items are capped per call to bound
//! daily cognitive load regardless of backlog size; overdue reviews are
//! never capped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::LearningItem;
use crate::srs::{days_between, retrievability, DESIRED_RETENTION};

/// Default cap on new (never-reviewed) items per selection
pub const DEFAULT_NEW_ITEM_CAP: usize = 15;

/// Items eligible for review at one instant
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DueSelection {
    /// Never-reviewed items, oldest captured first, capped
    pub new_items: Vec<LearningItem>,
    /// Previously reviewed items whose due date has passed, unbounded
    pub review_items: Vec<LearningItem>,
}

impl DueSelection {
    /// Total eligible items
    pub fn len(&self) -> usize {
        self.new_items.len() + self.review_items.len()
    }

    /// Whether nothing is eligible
    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty() && self.review_items.is_empty()
    }
}

/// Whether an item should be reviewed now
///
/// True if never reviewed, if the computed retrievability has dropped below
/// the threshold, or if the scheduled due date has passed.
pub fn is_due(item: &LearningItem, now: DateTime<Utc>, threshold: f64) -> bool {
    if item.last_reviewed_at.is_none() {
        return true;
    }
    if item.next_review_due_at <= now {
        return true;
    }
    let elapsed = days_between(item.last_reviewed_at, now);
    retrievability(item.stability, elapsed as f64) < threshold
}

/// Select items eligible for review
///
/// New items (`review_count == 0`) are ordered oldest-captured-first and
/// capped to `new_item_cap`; review items are all items whose
/// `next_review_due_at` has passed.
pub fn select_due(
    items: &[LearningItem],
    now: DateTime<Utc>,
    new_item_cap: usize,
) -> DueSelection {
    let mut new_items: Vec<LearningItem> = items
        .iter()
        .filter(|i| i.review_count == 0)
        .cloned()
        .collect();
    new_items.sort_by_key(|i| i.created_at);
    new_items.truncate(new_item_cap);

    let mut review_items: Vec<LearningItem> = items
        .iter()
        .filter(|i| i.review_count > 0 && i.next_review_due_at <= now)
        .cloned()
        .collect();
    // Most overdue first
    review_items.sort_by_key(|i| i.next_review_due_at);

    DueSelection {
        new_items,
        review_items,
    }
}

/// [`is_due`] with the standard 90% threshold
pub fn is_due_default(item: &LearningItem, now: DateTime<Utc>) -> bool {
    is_due(item, now, DESIRED_RETENTION)
}
