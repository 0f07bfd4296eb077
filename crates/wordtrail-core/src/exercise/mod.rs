//! Exercise Difficulty Selector
//!
//! Maps a word group's average mastery to a practice modality so exercises
//! get harder as recall improves:
//!
//! - multiple_choice: recognition, for groups still learning
//! - fill_blank: partial recall in context
//! - type_translation: full production

use serde::{Deserialize, Serialize};

use crate::item::LearningItem;

/// Practice modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Recognition-based, easiest
    #[default]
    MultipleChoice,
    /// Partial recall, medium
    FillBlank,
    /// Full production, hardest
    TypeTranslation,
}

impl ExerciseType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::MultipleChoice => "multiple_choice",
            ExerciseType::FillBlank => "fill_blank",
            ExerciseType::TypeTranslation => "type_translation",
        }
    }

    /// Parse from string name, falling back to the easiest modality
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fill_blank" => ExerciseType::FillBlank,
            "type_translation" => ExerciseType::TypeTranslation,
            _ => ExerciseType::MultipleChoice,
        }
    }

    /// Difficulty level 1-3, for sorting and display
    pub fn difficulty_level(&self) -> u8 {
        match self {
            ExerciseType::MultipleChoice => 1,
            ExerciseType::FillBlank => 2,
            ExerciseType::TypeTranslation => 3,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseType::MultipleChoice => "Multiple Choice",
            ExerciseType::FillBlank => "Fill in the Blank",
            ExerciseType::TypeTranslation => "Type Translation",
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Choose a modality from the group's average mastery
///
/// Mean consecutive correct sessions: < 1 → multiple choice, < 2 → fill in
/// the blank, otherwise type translation. Empty groups default to the
/// easiest modality.
pub fn select_modality(items: &[LearningItem]) -> ExerciseType {
    if items.is_empty() {
        return ExerciseType::MultipleChoice;
    }

    let total: i32 = items.iter().map(|i| i.consecutive_correct_sessions).sum();
    let average = total as f64 / items.len() as f64;

    if average < 1.0 {
        ExerciseType::MultipleChoice
    } else if average < 2.0 {
        ExerciseType::FillBlank
    } else {
        ExerciseType::TypeTranslation
    }
}

/// The single tested item for a group: lowest mastery, ties by original order
///
/// Used consistently across modalities so the highlighted word, the
/// distractor set, and the accepted answer all derive from the same item.
pub fn select_focus_item(items: &[LearningItem]) -> Option<&LearningItem> {
    items
        .iter()
        .min_by_key(|i| i.consecutive_correct_sessions)
}
