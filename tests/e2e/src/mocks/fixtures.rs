//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Learning items with various properties
//! - Batch capture for stress testing
//! - Pre-built scenarios for common test cases

use chrono::Utc;
use wordtrail_core::{CaptureInput, Category, LearningItem, Rating, Storage};

use crate::harness::db_manager::{NATIVE_LANG, TARGET_LANG, TEST_USER};

/// Factory for creating test data
///
/// Generates realistic test data with configurable properties.
/// Designed for creating comprehensive test scenarios.
///
/// # Example
///
/// ```rust,ignore
/// let storage = Storage::new(Some(path))?;
///
/// // Capture a single word
/// let item = TestDataFactory::capture_word(&storage, "autocarro", "bus");
///
/// // Capture a batch
/// let ids = TestDataFactory::capture_batch(&storage, 100);
///
/// // Create a specific scenario
/// let scenario = TestDataFactory::create_scheduling_scenario(&storage);
/// ```
pub struct TestDataFactory;

/// Scenario containing related test data
#[derive(Debug)]
pub struct TestScenario {
    /// IDs of created items
    pub item_ids: Vec<String>,
    /// Description of the scenario
    pub description: String,
    /// Metadata for test assertions
    pub metadata: std::collections::HashMap<String, String>,
}

impl TestDataFactory {
    // ========================================================================
    // SINGLE ITEM CAPTURE
    // ========================================================================

    /// Capture a word with its translation
    pub fn capture_word(storage: &Storage, text: &str, translation: &str) -> Option<LearningItem> {
        Self::capture_full(storage, text, translation, Category::Other, 0.5)
    }

    /// Capture a word with full configuration
    pub fn capture_full(
        storage: &Storage,
        text: &str,
        translation: &str,
        category: Category,
        confidence: f64,
    ) -> Option<LearningItem> {
        let input = CaptureInput {
            user_id: TEST_USER.to_string(),
            original_text: text.to_string(),
            translation: translation.to_string(),
            source_lang: TARGET_LANG.to_string(),
            target_lang: NATIVE_LANG.to_string(),
            category,
            category_confidence: confidence,
            ..Default::default()
        };
        storage.capture(input).ok()
    }

    /// Capture a phrase written in the native language
    ///
    /// The translation carries the target-language form, exercising the
    /// reversed capture direction.
    pub fn capture_native(
        storage: &Storage,
        text: &str,
        translation: &str,
        category: Category,
    ) -> Option<LearningItem> {
        let input = CaptureInput {
            user_id: TEST_USER.to_string(),
            original_text: text.to_string(),
            translation: translation.to_string(),
            source_lang: NATIVE_LANG.to_string(),
            target_lang: TARGET_LANG.to_string(),
            category,
            ..Default::default()
        };
        storage.capture(input).ok()
    }

    // ========================================================================
    // BATCH CAPTURE
    // ========================================================================

    /// Capture a batch of items across all categories
    pub fn capture_batch(storage: &Storage, count: usize) -> Vec<String> {
        let categories = Category::all();
        let mut ids = Vec::with_capacity(count);

        for i in 0..count {
            if let Some(item) = Self::capture_full(
                storage,
                &format!("palavra-{}", i),
                &format!("word-{}", i),
                categories[i % categories.len()],
                0.5 + (i % 5) as f64 * 0.1,
            ) {
                ids.push(item.id);
            }
        }

        ids
    }

    // ========================================================================
    // SCENARIO CREATION
    // ========================================================================

    /// Create a scenario for testing review scheduling
    pub fn create_scheduling_scenario(storage: &Storage) -> TestScenario {
        let now = Utc::now();
        let mut ids = Vec::new();
        let mut metadata = std::collections::HashMap::new();

        // New item (never reviewed)
        if let Some(item) = Self::capture_word(storage, "novo", "new") {
            metadata.insert("new".to_string(), item.id.clone());
            ids.push(item.id);
        }

        // Reviewed item (one Good rating, scheduled into the future)
        if let Some(item) = Self::capture_word(storage, "revisto", "reviewed") {
            let session = storage
                .get_or_create_session(TEST_USER, now)
                .expect("Failed to open session");
            let _ = storage.apply_review(&item.id, Rating::Good, &session, now);
            metadata.insert("reviewed".to_string(), item.id.clone());
            ids.push(item.id);
        }

        // Struggling item (lapsed in the same session)
        if let Some(item) = Self::capture_word(storage, "difícil", "difficult") {
            let session = storage
                .get_or_create_session(TEST_USER, now)
                .expect("Failed to open session");
            let _ = storage.apply_review(&item.id, Rating::Again, &session, now);
            metadata.insert("struggling".to_string(), item.id.clone());
            ids.push(item.id);
        }

        TestScenario {
            item_ids: ids,
            description: "Scheduling scenario with items in different learning states"
                .to_string(),
            metadata,
        }
    }

    /// Create a scenario for testing combination generation
    ///
    /// Two categories large enough to combine, one too small.
    pub fn create_combination_scenario(storage: &Storage) -> TestScenario {
        let mut ids = Vec::new();
        let mut metadata = std::collections::HashMap::new();

        for (text, translation) in [
            ("reunião", "meeting"),
            ("prazo", "deadline"),
            ("escritório", "office"),
            ("colega", "colleague"),
        ] {
            if let Some(item) =
                Self::capture_full(storage, text, translation, Category::Work, 0.9)
            {
                ids.push(item.id);
            }
        }
        metadata.insert("work_count".to_string(), "4".to_string());

        for (text, translation) in [
            ("almoço", "lunch"),
            ("jantar", "dinner"),
            ("sobremesa", "dessert"),
        ] {
            if let Some(item) =
                Self::capture_full(storage, text, translation, Category::FoodDining, 0.9)
            {
                ids.push(item.id);
            }
        }
        metadata.insert("food_count".to_string(), "3".to_string());

        // Singleton category: can never form a combination
        if let Some(item) =
            Self::capture_full(storage, "farmácia", "pharmacy", Category::Health, 0.9)
        {
            metadata.insert("singleton".to_string(), item.id.clone());
            ids.push(item.id);
        }

        TestScenario {
            item_ids: ids,
            description: "Combination scenario with two viable categories and a singleton"
                .to_string(),
            metadata,
        }
    }

    // ========================================================================
    // UTILITY METHODS
    // ========================================================================

    /// Generate target-language-looking content
    pub fn sample_word(seed: usize) -> String {
        const WORDS: [&str; 12] = [
            "casa", "tempo", "trabalho", "comida", "cidade", "amigo", "viagem", "mercado",
            "escola", "medico", "bilhete", "janela",
        ];
        format!("{}-{}", WORDS[seed % WORDS.len()], seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_storage() -> (Storage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        (Storage::new(Some(db_path)).unwrap(), dir)
    }

    #[test]
    fn test_capture_word() {
        let (storage, _dir) = create_test_storage();
        let item = TestDataFactory::capture_word(&storage, "autocarro", "bus");

        assert!(item.is_some());
        assert_eq!(item.unwrap().original_text, "autocarro");
    }

    #[test]
    fn test_capture_batch() {
        let (storage, _dir) = create_test_storage();
        let ids = TestDataFactory::capture_batch(&storage, 10);

        assert_eq!(ids.len(), 10);

        let stats = storage.stats(TEST_USER, Utc::now()).unwrap();
        assert_eq!(stats.total_items, 10);
    }

    #[test]
    fn test_create_scheduling_scenario() {
        let (storage, _dir) = create_test_storage();
        let scenario = TestDataFactory::create_scheduling_scenario(&storage);

        assert!(!scenario.item_ids.is_empty());
        assert!(scenario.metadata.contains_key("new"));
        assert!(scenario.metadata.contains_key("reviewed"));
        assert!(scenario.metadata.contains_key("struggling"));
    }

    #[test]
    fn test_create_combination_scenario() {
        let (storage, _dir) = create_test_storage();
        let scenario = TestDataFactory::create_combination_scenario(&storage);

        assert_eq!(scenario.item_ids.len(), 8);
        assert!(scenario.metadata.contains_key("singleton"));
    }
}
