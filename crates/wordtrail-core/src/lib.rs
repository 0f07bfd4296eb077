//! # Wordtrail Core
//!
//! Memory-scheduling and contextual-practice engine for personal vocabulary
//! learning:
//!
//! - **Retention model**: power-law forgetting curve `R(t) = (1 + t/(9S))^-1`
//!   where stability S is the number of days until recall probability decays
//!   to 90%
//! - **Scheduler**: rating-driven stability/difficulty revision with
//!   session-aware mastery tracking (3 correct sessions → ready to use)
//! - **Due-set selector**: daily new-item cap plus unbounded overdue reviews
//! - **Combination generator**: category-grouped, due-date-windowed word
//!   groups for multi-word practice sentences, deduplicated against history
//! - **Sentence synthesis adapter**: validates generated sentences against
//!   target words with four matching strategies, retrying with increased
//!   randomness
//! - **Exercise selector**: maps group mastery to a practice modality
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wordtrail_core::{Storage, CaptureInput, Rating};
//!
//! // Create storage (uses default platform-specific location)
//! let storage = Storage::new(None)?;
//!
//! // Capture a phrase
//! let input = CaptureInput {
//!     user_id: "user-1".to_string(),
//!     original_text: "pastel de nata".to_string(),
//!     translation: "custard tart".to_string(),
//!     source_lang: "pt-PT".to_string(),
//!     target_lang: "en".to_string(),
//!     ..Default::default()
//! };
//! let item = storage.capture(input)?;
//!
//! // Review it
//! let now = chrono::Utc::now();
//! let session = storage.get_or_create_session(&item.user_id, now)?;
//! let updated = storage.apply_review(&item.id, Rating::Good, &session, now)?;
//! ```
//!
//! The core takes `now` as an explicit parameter everywhere scheduling
//! decisions are made, so all behavior is deterministic under test.

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod combine;
pub mod exercise;
pub mod item;
pub mod selector;
pub mod sentence;
pub mod services;
pub mod srs;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Item types
pub use item::{CaptureInput, Category, LearningItem, MasteryStatus, VocabularyStats};

// Retention model and scheduler
pub use srs::{
    days_between,
    mastery_for,
    process_review,
    // Core retention curve
    retrievability,
    Rating,
    ScheduleUpdate,
    DESIRED_RETENTION,
    MAX_DIFFICULTY,
    MAX_INTERVAL_DAYS,
    MIN_DIFFICULTY,
    MIN_STABILITY,
};

// Due-set selection
pub use selector::{is_due, select_due, DueSelection, DEFAULT_NEW_ITEM_CAP};

// Combination generation
pub use combine::{
    combination_hash, combinations_for_category, k_combinations, unused_combinations,
    CombinationConfig, WordCombination,
};

// Sentence synthesis
pub use sentence::{
    sentence_contains_words, synthesize_with_retry, GeneratedSentence, SentenceDraft,
    SentenceError, SentenceRequest, DEFAULT_MAX_ATTEMPTS,
};

// Exercise modality
pub use exercise::{select_focus_item, select_modality, ExerciseType};

// External service boundaries
pub use services::{SentenceService, ServiceError, SpeechService, TranslationResult, TranslationService};

// Storage layer
pub use storage::{ReviewSession, Result, Storage, StorageError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CaptureInput, Category, CombinationConfig, DueSelection, ExerciseType, GeneratedSentence,
        LearningItem, MasteryStatus, Rating, Result, ScheduleUpdate, SentenceRequest,
        SentenceService, Storage, StorageError, VocabularyStats, WordCombination,
    };
}
