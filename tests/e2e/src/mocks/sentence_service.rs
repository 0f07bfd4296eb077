//! Mock Sentence Services
//!
//! Test doubles for the sentence-generation boundary. The echo service
//! always produces a valid sentence; the flaky one fails a configured number
//! of calls first, for exercising the retry path.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use wordtrail_core::sentence::{SentenceDraft, SentencePrompt};
use wordtrail_core::{SentenceService, ServiceError};

/// Produces a sentence that trivially contains every requested word
pub struct EchoSentenceService;

#[async_trait]
impl SentenceService for EchoSentenceService {
    async fn generate(&self, prompt: &SentencePrompt) -> Result<SentenceDraft, ServiceError> {
        Ok(SentenceDraft {
            text: format!("Hoje falamos de {}.", prompt.words.join(" e ")),
            translation: format!("Today we talk about {}.", prompt.words.join(" and ")),
        })
    }
}

/// Fails the first `failures` calls, then behaves like [`EchoSentenceService`]
pub struct FlakySentenceService {
    failures: u32,
    calls: AtomicU32,
}

impl FlakySentenceService {
    /// Create a service that errors on the first `failures` calls
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentenceService for FlakySentenceService {
    async fn generate(&self, prompt: &SentencePrompt) -> Result<SentenceDraft, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(ServiceError::Unreachable(format!(
                "simulated outage on call {}",
                call + 1
            )));
        }
        EchoSentenceService.generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> SentencePrompt {
        SentencePrompt {
            words: vec!["reunião".to_string(), "prazo".to_string()],
            target_language: "pt-PT".to_string(),
            native_language: "en".to_string(),
            register: "natural".to_string(),
            max_words: 10,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn test_echo_contains_every_word() {
        let draft = EchoSentenceService.generate(&prompt()).await.unwrap();
        assert!(draft.text.contains("reunião"));
        assert!(draft.text.contains("prazo"));
    }

    #[tokio::test]
    async fn test_flaky_fails_then_recovers() {
        let service = FlakySentenceService::new(2);
        assert!(service.generate(&prompt()).await.is_err());
        assert!(service.generate(&prompt()).await.is_err());
        assert!(service.generate(&prompt()).await.is_ok());
        assert_eq!(service.call_count(), 3);
    }
}
