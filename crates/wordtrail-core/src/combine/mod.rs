//! Combination Generator
//!
//! Builds bounded-size groups of due items eligible to be combined into one
//! practice sentence. Items are grouped by category so the generated sentence
//! has a coherent topic, windowed by due-date proximity so the group is
//! reviewed together at a sensible time, and deduplicated against a persisted
//! used-combination log so the same member set is never practiced twice.
//!
//! The per-category, per-window, and per-output caps are safety valves
//! against combinatorial blow-up on large vocabularies, not business rules;
//! tune them via [`CombinationConfig`] without touching the algorithm.

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::item::{Category, LearningItem};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Tunable bounds for combination generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationConfig {
    /// Minimum members per combination
    pub min_size: usize,
    /// Maximum members per combination
    pub max_size: usize,
    /// Window width: members must be due within this many days of the anchor
    pub due_window_days: i64,
    /// Most-overdue items considered per category
    pub max_items_per_category: usize,
    /// Items considered per anchor window
    pub max_window_size: usize,
    /// Hard combinatorial ceiling per category
    pub max_combinations_per_category: usize,
}

impl Default for CombinationConfig {
    fn default() -> Self {
        Self {
            min_size: 2,
            max_size: 5,
            due_window_days: 7,
            max_items_per_category: 30,
            max_window_size: 10,
            max_combinations_per_category: 100,
        }
    }
}

// ============================================================================
// WORD COMBINATION
// ============================================================================

/// An ephemeral set of 2-5 items chosen for one practice sentence
///
/// Identified by a deterministic, order-independent hash of member ids so
/// repeats can be detected against the used-combination log. Regenerated per
/// request, never stored as first-class state beyond that hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCombination {
    /// Member items
    pub items: Vec<LearningItem>,
    /// Sorted member ids joined with `|`
    pub hash: String,
}

impl WordCombination {
    fn new(items: Vec<LearningItem>) -> Self {
        let hash = combination_hash(items.iter().map(|i| i.id.as_str()));
        Self { items, hash }
    }

    /// Earliest due date among members (urgency key)
    pub fn earliest_due(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.items.iter().map(|i| i.next_review_due_at).min()
    }

    /// Member ids in combination order
    pub fn member_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }
}

/// Deterministic hash for a member set: sorted ids, pipe-joined
///
/// Two sets with the same members in any order collapse to the same hash.
pub fn combination_hash<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let mut sorted: Vec<&str> = ids.into_iter().collect();
    sorted.sort_unstable();
    sorted.join("|")
}

// ============================================================================
// SUBSET ENUMERATION
// ============================================================================

/// All k-element subsets of a slice, preserving element order
///
/// `k_combinations(&[a, b, c], 2)` → `[[a, b], [a, c], [b, c]]`
pub fn k_combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    if k == items.len() {
        return vec![items.to_vec()];
    }
    if k == 1 {
        return items.iter().map(|x| vec![x.clone()]).collect();
    }

    let mut result = Vec::new();
    for i in 0..=items.len() - k {
        let head = &items[i];
        for mut tail in k_combinations(&items[i + 1..], k - 1) {
            let mut combo = Vec::with_capacity(k);
            combo.push(head.clone());
            combo.append(&mut tail);
            result.push(combo);
        }
    }
    result
}

// ============================================================================
// PER-CATEGORY GENERATION
// ============================================================================

/// Generate combinations within one category
///
/// Sorts by due date ascending (most overdue first), caps to the most-overdue
/// `max_items_per_category`, then slides a due-date window over the remaining
/// items: for each anchor, members due within `due_window_days` of the anchor
/// (capped to `max_window_size`) are enumerated into subsets of every size in
/// `min_size..=min(max_size, window)`. Output stops at the per-category
/// ceiling and never contains two subsets with the same member hash.
pub fn combinations_for_category(
    items: &[LearningItem],
    config: &CombinationConfig,
) -> Vec<WordCombination> {
    if items.len() < config.min_size {
        return Vec::new();
    }

    let mut sorted: Vec<LearningItem> = items.to_vec();
    sorted.sort_by_key(|i| i.next_review_due_at);
    sorted.truncate(config.max_items_per_category);

    let window_width = Duration::days(config.due_window_days);
    let mut seen: HashSet<String> = HashSet::new();
    let mut combinations: Vec<WordCombination> = Vec::new();

    for (anchor_idx, anchor) in sorted.iter().enumerate() {
        if combinations.len() >= config.max_combinations_per_category {
            break;
        }

        let window_end = anchor.next_review_due_at + window_width;
        let mut window: Vec<LearningItem> = vec![anchor.clone()];
        for candidate in &sorted[anchor_idx + 1..] {
            if window.len() >= config.max_window_size {
                break;
            }
            if candidate.next_review_due_at <= window_end {
                window.push(candidate.clone());
            }
        }

        if window.len() < config.min_size {
            continue;
        }

        let max_k = config.max_size.min(window.len());
        for k in config.min_size..=max_k {
            if combinations.len() >= config.max_combinations_per_category {
                break;
            }
            for members in k_combinations(&window, k) {
                if combinations.len() >= config.max_combinations_per_category {
                    break;
                }
                let combo = WordCombination::new(members);
                if seen.insert(combo.hash.clone()) {
                    combinations.push(combo);
                }
            }
        }
    }

    combinations
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Generate unused combinations across all categories
///
/// Groups items by category, generates per category, deduplicates globally,
/// drops member sets already present in `used_hashes`, orders by earliest
/// member due date (most urgent first), and truncates to `max`.
///
/// Data sparsity (no items, categories too small, everything already used)
/// yields an empty vector, never an error.
pub fn unused_combinations(
    items: &[LearningItem],
    used_hashes: &HashSet<String>,
    config: &CombinationConfig,
    max: usize,
) -> Vec<WordCombination> {
    let mut by_category: HashMap<Category, Vec<LearningItem>> = HashMap::new();
    for item in items {
        by_category
            .entry(item.category)
            .or_default()
            .push(item.clone());
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut all: Vec<WordCombination> = Vec::new();

    // Fixed category order keeps the output set deterministic
    for category in Category::all() {
        let Some(category_items) = by_category.get(&category) else {
            continue;
        };
        for combo in combinations_for_category(category_items, config) {
            if used_hashes.contains(&combo.hash) {
                continue;
            }
            if seen.insert(combo.hash.clone()) {
                all.push(combo);
            }
        }
    }

    tracing::debug!(
        candidates = all.len(),
        used = used_hashes.len(),
        "generated unused combinations"
    );

    all.sort_by_key(|c| c.earliest_due());
    all.truncate(max);
    all
}

// ============================================================================
// TESTS
// ============================================================================
