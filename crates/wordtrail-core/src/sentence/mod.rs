//! Sentence Synthesis Adapter
//!
//! Calls the external sentence-generation service with a target word list,
//! validates that the result contains every target word, and retries with
//! increased generation randomness on validation failure. After exhausting
//! retries the last attempt is returned flagged invalid rather than failing
//! the caller, which decides whether to discard it.
//!
//! The adapter defines no timeout of its own; cancellation is the caller's
//! concern.

mod validate;

pub use validate::sentence_contains_words;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combine::{combination_hash, WordCombination};
use crate::exercise::{select_modality, ExerciseType};
use crate::item::LearningItem;
use crate::services::{SentenceService, ServiceError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Generation attempts before giving up on a valid sentence
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Starting generation temperature (some creativity, not too random)
pub const BASE_TEMPERATURE: f64 = 0.7;

/// Temperature increase per retry, for more variation
pub const TEMPERATURE_STEP: f64 = 0.1;

/// Length bound passed to the generation service
pub const MAX_SENTENCE_WORDS: usize = 10;

/// Proficiency register constraint passed to the generation service
pub const DEFAULT_REGISTER: &str = "natural spoken language for an adult learner";

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// A practice-sentence request built from one word combination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceRequest {
    /// Member items of the combination
    pub items: Vec<LearningItem>,
    /// Language the sentence must be written in
    pub target_language: String,
    /// Language of the translation
    pub native_language: String,
}

impl SentenceRequest {
    /// Build a request from a generated combination
    pub fn from_combination(
        combination: &WordCombination,
        target_language: impl Into<String>,
        native_language: impl Into<String>,
    ) -> Self {
        Self {
            items: combination.items.clone(),
            target_language: target_language.into(),
            native_language: native_language.into(),
        }
    }

    /// Target words in the target language
    ///
    /// An item captured in the target language contributes its original text;
    /// one captured in the native language contributes its translation.
    pub fn target_words(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.text_in_language(&self.target_language).to_string())
            .collect()
    }

    /// Order-independent hash of the member ids
    pub fn combination_hash(&self) -> String {
        combination_hash(self.items.iter().map(|i| i.id.as_str()))
    }

    fn prompt(&self, temperature: f64) -> SentencePrompt {
        SentencePrompt {
            words: self.target_words(),
            target_language: self.target_language.clone(),
            native_language: self.native_language.clone(),
            register: DEFAULT_REGISTER.to_string(),
            max_words: MAX_SENTENCE_WORDS,
            temperature,
        }
    }
}

/// Prompt handed to the sentence-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentencePrompt {
    /// Words the sentence must contain, in the target language
    pub words: Vec<String>,
    /// Language to generate in
    pub target_language: String,
    /// Language to translate into
    pub native_language: String,
    /// Register constraint
    pub register: String,
    /// Length bound in words
    pub max_words: usize,
    /// Generation randomness
    pub temperature: f64,
}

/// Raw service output before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceDraft {
    /// Generated sentence in the target language
    pub text: String,
    /// Translation in the native language
    pub translation: String,
}

/// A validated (or flagged-invalid) practice sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSentence {
    /// Sentence text in the target language
    pub text: String,
    /// Translation in the native language
    pub translation: String,
    /// Member item ids
    pub item_ids: Vec<String>,
    /// Order-independent hash of the member ids
    pub combination_hash: String,
    /// Exercise modality assigned from the group's mastery
    pub exercise_type: ExerciseType,
    /// Whether validation found every target word
    pub is_valid: bool,
    /// When the sentence was produced
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Sentence synthesis failure
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SentenceError {
    /// Every generation attempt failed at the service boundary
    #[error("sentence service failed after {attempts} attempts: {source}")]
    Service {
        /// Attempts made
        attempts: u32,
        /// Last service error
        source: ServiceError,
    },
    /// The request carried no items to build a sentence from
    #[error("sentence request has no items")]
    EmptyRequest,
}

// ============================================================================
// SYNTHESIS
// ============================================================================

/// Generate a practice sentence with bounded validation retries
///
/// Each attempt raises the generation temperature for more variation. A
/// sentence failing validation on the final attempt is still returned,
/// flagged `is_valid = false`; only a service error on *every* attempt
/// surfaces as [`SentenceError::Service`].
pub async fn synthesize_with_retry(
    service: &dyn SentenceService,
    request: &SentenceRequest,
    max_attempts: u32,
) -> Result<GeneratedSentence, SentenceError> {
    if request.items.is_empty() {
        return Err(SentenceError::EmptyRequest);
    }

    let target_words = request.target_words();
    let mut last_draft: Option<SentenceDraft> = None;
    let mut last_error: Option<ServiceError> = None;

    for attempt in 1..=max_attempts.max(1) {
        let temperature = BASE_TEMPERATURE + TEMPERATURE_STEP * (attempt - 1) as f64;
        match service.generate(&request.prompt(temperature)).await {
            Ok(draft) => {
                if sentence_contains_words(&draft.text, &target_words) {
                    return Ok(finish(request, draft, true));
                }
                tracing::warn!(
                    attempt,
                    max_attempts,
                    sentence = %draft.text,
                    targets = ?target_words,
                    "sentence validation failed"
                );
                last_draft = Some(draft);
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "sentence generation failed");
                last_error = Some(e);
            }
        }
    }

    // Degrade to the last draft rather than failing the caller; a flagged
    // sentence beats no sentence.
    if let Some(draft) = last_draft {
        return Ok(finish(request, draft, false));
    }

    Err(SentenceError::Service {
        attempts: max_attempts.max(1),
        source: last_error.unwrap_or_else(|| {
            ServiceError::MalformedResponse("no attempts recorded".to_string())
        }),
    })
}

fn finish(request: &SentenceRequest, draft: SentenceDraft, is_valid: bool) -> GeneratedSentence {
    GeneratedSentence {
        text: draft.text,
        translation: draft.translation,
        item_ids: request.items.iter().map(|i| i.id.clone()).collect(),
        combination_hash: request.combination_hash(),
        exercise_type: select_modality(&request.items),
        is_valid,
        generated_at: Utc::now(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
