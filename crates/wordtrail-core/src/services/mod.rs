//! External Service Boundaries
//!
//! The core is a library, not a network service: external text capabilities
//! are consumed through these traits and implemented by the calling
//! application (HTTP clients, SDKs, test doubles). Timeouts and cancellation
//! are the caller's concern; the core propagates whatever the surrounding
//! context dictates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::item::Category;
use crate::sentence::{SentenceDraft, SentencePrompt};

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Failure at an external service boundary
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Service unreachable or timed out
    #[error("service unreachable: {0}")]
    Unreachable(String),
    /// Service responded with something the adapter cannot parse
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Service rejected the call due to quota or rate limits
    #[error("rate limited")]
    RateLimited,
}

// ============================================================================
// TRANSLATION / CATEGORIZATION
// ============================================================================

/// Output of the translation/categorization service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    /// Translated text
    pub translation: String,
    /// One of the fixed 8 categories
    pub category: Category,
    /// Categorization confidence (0-1)
    pub confidence: f64,
}

/// Translates captured text and assigns a category
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate `text` from `source_lang` to `target_lang` and categorize it
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TranslationResult, ServiceError>;
}

// ============================================================================
// SENTENCE GENERATION
// ============================================================================

/// Generates one practice sentence from a target word list
///
/// Single structured response, no streaming. The `temperature` knob in the
/// prompt controls generation randomness; the synthesis adapter raises it on
/// each validation retry.
#[async_trait]
pub trait SentenceService: Send + Sync {
    /// Generate a sentence containing every word in the prompt
    async fn generate(&self, prompt: &SentencePrompt) -> Result<SentenceDraft, ServiceError>;
}

// ============================================================================
// TEXT-TO-SPEECH
// ============================================================================

/// Synthesizes audio for a sentence or phrase
///
/// Audio storage is a collaborator concern; the core only carries the
/// resulting location as `audio_url`.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `text` spoken in `language_code`, returning encoded audio
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, ServiceError>;
}
