//! Learning Item - The fundamental unit of vocabulary
//!
//! Each item represents one captured word or phrase with:
//! - Original text and translation for a language pair
//! - FSRS scheduling state (stability, difficulty, retrievability)
//! - Session-aware mastery counters
//! - A category used to group items into practice sentences

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CATEGORIES
// ============================================================================

/// Vocabulary category
///
/// Fixed 8-entry taxonomy (Miller's Law consolidation: 7 ± 2 items). The
/// translation/categorization service must return one of these values;
/// anything unrecognized parses to `Other`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Food, restaurants, groceries
    FoodDining,
    /// Work and bureaucracy
    Work,
    /// Home, time, everyday routines
    DailyLife,
    /// Social situations and greetings
    Social,
    /// Shopping
    Shopping,
    /// Getting around
    Transport,
    /// Health and emergencies
    Health,
    /// Everything else
    #[default]
    Other,
}

impl Category {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodDining => "food_dining",
            Category::Work => "work",
            Category::DailyLife => "daily_life",
            Category::Social => "social",
            Category::Shopping => "shopping",
            Category::Transport => "transport",
            Category::Health => "health",
            Category::Other => "other",
        }
    }

    /// Parse from string name, falling back to `Other`
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "food_dining" => Category::FoodDining,
            "work" => Category::Work,
            "daily_life" => Category::DailyLife,
            "social" => Category::Social,
            "shopping" => Category::Shopping,
            "transport" => Category::Transport,
            "health" => Category::Health,
            _ => Category::Other,
        }
    }

    /// All valid categories
    pub fn all() -> [Category; 8] {
        [
            Category::FoodDining,
            Category::Work,
            Category::DailyLife,
            Category::Social,
            Category::Shopping,
            Category::Transport,
            Category::Health,
            Category::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// MASTERY STATUS
// ============================================================================

/// Coarse 3-stage mastery label
///
/// Derived purely from `consecutive_correct_sessions`:
/// 0 → Learning, 1-2 → Learned, 3+ → ReadyToUse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    /// Not yet recalled correctly in any session
    #[default]
    Learning,
    /// Recalled correctly in 1-2 distinct sessions
    Learned,
    /// Recalled correctly in 3+ distinct sessions
    ReadyToUse,
}

impl MasteryStatus {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryStatus::Learning => "learning",
            MasteryStatus::Learned => "learned",
            MasteryStatus::ReadyToUse => "ready_to_use",
        }
    }

    /// Parse from string name, falling back to `Learning`
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "learned" => MasteryStatus::Learned,
            "ready_to_use" => MasteryStatus::ReadyToUse,
            _ => MasteryStatus::Learning,
        }
    }
}

impl std::fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// LEARNING ITEM
// ============================================================================

/// A captured word or phrase owned by one user
///
/// Scheduling state is mutated only by the scheduler on each rating event;
/// the item is never hard-deleted by the core.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Opaque owner identifier supplied by the session/identity provider
    pub user_id: String,
    /// The captured phrase
    pub original_text: String,
    /// Translation of the captured phrase
    pub translation: String,
    /// Language the phrase was captured in
    pub source_lang: String,
    /// Language the phrase was translated to
    pub target_lang: String,
    /// Vocabulary category (8-entry taxonomy)
    pub category: Category,
    /// Categorization confidence from the translation service (0-1)
    pub category_confidence: f64,

    // ========== FSRS State ==========
    /// Inherent difficulty (0.0 = easy, 10.0 = hard)
    pub difficulty: f64,
    /// Memory stability: days until retrievability decays to 90%
    pub stability: f64,
    /// Modeled probability of successful recall (0-1)
    pub retrievability: f64,
    /// Next scheduled review date
    pub next_review_due_at: DateTime<Utc>,
    /// Last time the item was reviewed
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Total number of reviews
    pub review_count: i32,
    /// Times the item was forgotten (rating = Again)
    pub lapse_count: i32,

    // ========== Mastery Tracking (3 Correct Sessions Rule) ==========
    /// Correct recalls across distinct sessions
    pub consecutive_correct_sessions: i32,
    /// Session that last counted toward mastery (prevents same-session
    /// double-counting)
    pub last_correct_session_id: Option<String>,
    /// Derived mastery label
    pub mastery_status: MasteryStatus,

    // ========== Collaborator Output ==========
    /// TTS audio location, produced and stored by an external collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    // ========== Timestamps ==========
    /// When the item was captured
    pub created_at: DateTime<Utc>,
    /// When the item was last modified
    pub updated_at: DateTime<Utc>,
}

impl Default for LearningItem {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            user_id: String::new(),
            original_text: String::new(),
            translation: String::new(),
            source_lang: String::new(),
            target_lang: String::new(),
            category: Category::Other,
            category_confidence: 0.5,
            difficulty: 5.0,
            stability: 1.0,
            retrievability: 1.0,
            next_review_due_at: now,
            last_reviewed_at: None,
            review_count: 0,
            lapse_count: 0,
            consecutive_correct_sessions: 0,
            last_correct_session_id: None,
            mastery_status: MasteryStatus::Learning,
            audio_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl LearningItem {
    /// Create a new item with the given text, scheduled for immediate review
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            ..Default::default()
        }
    }

    /// Whether the item has never been reviewed
    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }

    /// The item's text in the given target language
    ///
    /// The user may have captured the phrase in either direction; practice
    /// sentences always need the target-language form.
    pub fn text_in_language(&self, target_language: &str) -> &str {
        let target_primary = primary_subtag(target_language);
        if primary_subtag(&self.source_lang) == target_primary {
            &self.original_text
        } else {
            &self.translation
        }
    }
}

/// Primary language subtag: "pt-PT" → "pt"
fn primary_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Input for capturing a new word or phrase
///
/// Uses `deny_unknown_fields` to prevent field injection attacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptureInput {
    /// Owner of the new item
    pub user_id: String,
    /// The captured phrase
    pub original_text: String,
    /// Translation, typically from the translation service
    pub translation: String,
    /// Language the phrase was captured in
    pub source_lang: String,
    /// Language the phrase was translated to
    pub target_lang: String,
    /// Category assigned by the translation service
    #[serde(default)]
    pub category: Category,
    /// Categorization confidence (0-1)
    #[serde(default = "default_confidence")]
    pub category_confidence: f64,
    /// Optional TTS audio location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

fn default_confidence() -> f64 {
    0.5
}

impl Default for CaptureInput {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            original_text: String::new(),
            translation: String::new(),
            source_lang: String::new(),
            target_lang: String::new(),
            category: Category::Other,
            category_confidence: 0.5,
            audio_url: None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
