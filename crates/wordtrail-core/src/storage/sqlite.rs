//! SQLite Storage Implementation
//!
//! Item store, review-session bookkeeping, and the used-combination log.
//! Each review is a read-modify-write on exactly one item; the single writer
//! connection serializes concurrent writes so duplicate submissions resolve
//! to last-write-wins instead of a lost update.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::combine::{self, CombinationConfig, WordCombination};
use crate::item::{CaptureInput, Category, LearningItem, MasteryStatus, VocabularyStats};
use crate::selector::{select_due, DueSelection};
use crate::sentence::GeneratedSentence;
use crate::srs::{process_review, Rating};

/// A new session starts when more than this many hours pass since the last
/// review activity
pub const SESSION_BOUNDARY_HOURS: i64 = 2;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// REVIEW SESSION
// ============================================================================

/// A bounded window of review activity for one user
///
/// The scheduler only compares session ids for equality; the boundary policy
/// (2 hours of inactivity) lives here as a collaborator convenience.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owner of the session
    pub user_id: String,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended, if it has
    pub ended_at: Option<DateTime<Utc>>,
    /// Ratings submitted during the session
    pub words_reviewed: i32,
    /// Ratings of Good or Easy
    pub correct_count: i32,
}

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage struct
///
/// Uses separate reader/writer connections for interior mutability. All
/// methods take `&self`, making Storage `Send + Sync` so callers can share
/// it as `Arc<Storage>`.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl Storage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Create new storage instance
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "wordtrail", "core").ok_or_else(|| {
                    StorageError::Init("Could not determine project directories".to_string())
                })?;

                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("wordtrail.db")
            }
        };

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
        })
    }

    // ========================================================================
    // ITEMS
    // ========================================================================

    /// Capture a new word or phrase
    ///
    /// Lifecycle defaults: difficulty 5.0, stability 1.0, retrievability 1.0,
    /// due immediately, never reviewed.
    pub fn capture(&self, input: CaptureInput) -> Result<LearningItem> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "INSERT INTO learning_items (
                    id, user_id, original_text, translation, source_lang, target_lang,
                    category, category_confidence,
                    difficulty, stability, retrievability,
                    next_review_due_at, last_reviewed_at, review_count, lapse_count,
                    consecutive_correct_sessions, last_correct_session_id, mastery_status,
                    audio_url, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 5.0, 1.0, 1.0, ?9, NULL, 0, 0,
                          0, NULL, 'learning', ?10, ?11, ?12)",
                params![
                    id,
                    input.user_id,
                    input.original_text,
                    input.translation,
                    input.source_lang,
                    input.target_lang,
                    input.category.as_str(),
                    input.category_confidence,
                    now.to_rfc3339(),
                    input.audio_url,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;
        }

        tracing::info!(item_id = %id, user_id = %input.user_id, "captured item");

        self.get_item(&id)?
            .ok_or_else(|| StorageError::NotFound(id))
    }

    /// Get an item by ID
    pub fn get_item(&self, id: &str) -> Result<Option<LearningItem>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare("SELECT * FROM learning_items WHERE id = ?1")?;

        let item = stmt
            .query_row(params![id], |row| Self::row_to_item(row))
            .optional()?;
        Ok(item)
    }

    /// Delete an item (collaborator convenience; the core never calls this)
    pub fn delete_item(&self, id: &str) -> Result<bool> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        let deleted = writer.execute("DELETE FROM learning_items WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// All items for one user and language pair
    ///
    /// Matches both capture directions: source=target/target=native and
    /// source=native/target=target. Mixing language pairs in one practice
    /// set is never allowed.
    pub fn items_for_user(
        &self,
        user_id: &str,
        native_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<LearningItem>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM learning_items
             WHERE user_id = ?1
               AND ((source_lang = ?2 AND target_lang = ?3)
                 OR (source_lang = ?3 AND target_lang = ?2))
             ORDER BY created_at ASC",
        )?;

        let rows = stmt.query_map(params![user_id, target_lang, native_lang], |row| {
            Self::row_to_item(row)
        })?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }
        Ok(items)
    }

    /// Items whose due date falls within `window_days` of `now`
    ///
    /// Input set for the combination generator: overdue items plus items
    /// coming due soon enough to be grouped with them.
    pub fn items_due_within(
        &self,
        user_id: &str,
        native_lang: &str,
        target_lang: &str,
        now: DateTime<Utc>,
        window_days: i64,
    ) -> Result<Vec<LearningItem>> {
        let horizon = now + Duration::days(window_days);

        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM learning_items
             WHERE user_id = ?1
               AND next_review_due_at <= ?2
               AND ((source_lang = ?3 AND target_lang = ?4)
                 OR (source_lang = ?4 AND target_lang = ?3))
             ORDER BY next_review_due_at ASC",
        )?;

        let rows = stmt.query_map(
            params![user_id, horizon.to_rfc3339(), target_lang, native_lang],
            |row| Self::row_to_item(row),
        )?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }
        Ok(items)
    }

    /// Items eligible for review now, with the daily new-item cap applied
    pub fn due_items(
        &self,
        user_id: &str,
        native_lang: &str,
        target_lang: &str,
        now: DateTime<Utc>,
        new_item_cap: usize,
    ) -> Result<DueSelection> {
        let items = self.items_for_user(user_id, native_lang, target_lang)?;
        Ok(select_due(&items, now, new_item_cap))
    }

    // ========================================================================
    // REVIEWS
    // ========================================================================

    /// Apply one rating to an item
    ///
    /// Runs the scheduler against the stored state and writes the resulting
    /// patch in a single UPDATE. Session counters are bumped alongside.
    pub fn apply_review(
        &self,
        item_id: &str,
        rating: Rating,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<LearningItem> {
        let item = self
            .get_item(item_id)?
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))?;

        let update = process_review(&item, rating, session_id, now);

        {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "UPDATE learning_items SET
                    difficulty = ?1,
                    stability = ?2,
                    retrievability = ?3,
                    next_review_due_at = ?4,
                    last_reviewed_at = ?5,
                    review_count = ?6,
                    lapse_count = ?7,
                    consecutive_correct_sessions = ?8,
                    last_correct_session_id = ?9,
                    mastery_status = ?10,
                    updated_at = ?11
                WHERE id = ?12",
                params![
                    update.difficulty,
                    update.stability,
                    update.retrievability,
                    update.next_review_due_at.to_rfc3339(),
                    update.last_reviewed_at.to_rfc3339(),
                    update.review_count,
                    update.lapse_count,
                    update.consecutive_correct_sessions,
                    update.last_correct_session_id,
                    update.mastery_status.as_str(),
                    update.updated_at.to_rfc3339(),
                    item_id,
                ],
            )?;

            writer.execute(
                "UPDATE review_sessions SET
                    words_reviewed = words_reviewed + 1,
                    correct_count = correct_count + ?1
                WHERE id = ?2",
                params![if rating.is_correct() { 1 } else { 0 }, session_id],
            )?;
        }

        self.get_item(item_id)?
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    /// Get or create a review session
    ///
    /// Reuses the latest open session when it started within the 2-hour
    /// boundary; otherwise closes it and starts a fresh one.
    pub fn get_or_create_session(&self, user_id: &str, now: DateTime<Utc>) -> Result<String> {
        let existing: Option<(String, String)> = {
            let reader = self
                .reader
                .lock()
                .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
            reader
                .query_row(
                    "SELECT id, started_at FROM review_sessions
                     WHERE user_id = ?1 AND ended_at IS NULL
                     ORDER BY started_at DESC LIMIT 1",
                    params![user_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?
        };

        let boundary = now - Duration::hours(SESSION_BOUNDARY_HOURS);

        if let Some((id, started_at)) = existing {
            let started_at = Self::parse_timestamp(&started_at, "started_at")
                .map_err(|e| StorageError::InvalidTimestamp(e.to_string()))?;
            if started_at >= boundary {
                return Ok(id);
            }
            // Stale session: close it before opening a new one
            self.end_session(&id, now)?;
        }

        let id = Uuid::new_v4().to_string();
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO review_sessions (id, user_id, started_at, ended_at, words_reviewed, correct_count)
             VALUES (?1, ?2, ?3, NULL, 0, 0)",
            params![id, user_id, now.to_rfc3339()],
        )?;
        Ok(id)
    }

    /// Close a session
    pub fn end_session(&self, session_id: &str, now: DateTime<Utc>) -> Result<()> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "UPDATE review_sessions SET ended_at = ?1 WHERE id = ?2 AND ended_at IS NULL",
            params![now.to_rfc3339(), session_id],
        )?;
        Ok(())
    }

    /// Get a session by ID
    pub fn get_session(&self, session_id: &str) -> Result<Option<ReviewSession>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let session = reader
            .query_row(
                "SELECT id, user_id, started_at, ended_at, words_reviewed, correct_count
                 FROM review_sessions WHERE id = ?1",
                params![session_id],
                |row| {
                    let started_at: String = row.get(2)?;
                    let ended_at: Option<String> = row.get(3)?;
                    Ok(ReviewSession {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        started_at: Self::parse_timestamp(&started_at, "started_at")?,
                        ended_at: ended_at.and_then(|s| {
                            DateTime::parse_from_rfc3339(&s)
                                .map(|dt| dt.with_timezone(&Utc))
                                .ok()
                        }),
                        words_reviewed: row.get(4)?,
                        correct_count: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    // ========================================================================
    // SENTENCES / USED-COMBINATION LOG
    // ========================================================================

    /// Combination hashes already used for this user
    pub fn used_combination_hashes(&self, user_id: &str) -> Result<HashSet<String>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT combination_hash FROM generated_sentences WHERE user_id = ?1",
        )?;

        let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

        let mut hashes = HashSet::new();
        for hash in rows {
            hashes.insert(hash?);
        }
        Ok(hashes)
    }

    /// Persist a generated sentence, logging its combination as used
    ///
    /// Returns the new sentence id. The combination check-then-log sequence
    /// is not transactional across concurrent requests; a duplicate sentence
    /// is a harmless re-validation, not a correctness violation.
    pub fn record_sentence(
        &self,
        user_id: &str,
        sentence: &GeneratedSentence,
        audio_url: Option<&str>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let item_ids = serde_json::to_string(&sentence.item_ids)
            .map_err(|e| StorageError::Init(format!("Failed to encode item ids: {}", e)))?;

        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO generated_sentences (
                id, user_id, text, translation, item_ids, combination_hash,
                exercise_type, is_valid, audio_url, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                user_id,
                sentence.text,
                sentence.translation,
                item_ids,
                sentence.combination_hash,
                sentence.exercise_type.as_str(),
                sentence.is_valid as i32,
                audio_url,
                sentence.generated_at.to_rfc3339(),
            ],
        )?;
        Ok(id)
    }

    /// Generate unused combinations for a user over the persisted state
    ///
    /// Loads the due-window items for the language pair, reads the used-hash
    /// log, and runs the combination pipeline.
    pub fn unused_combinations(
        &self,
        user_id: &str,
        native_lang: &str,
        target_lang: &str,
        config: &CombinationConfig,
        max: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<WordCombination>> {
        let items =
            self.items_due_within(user_id, native_lang, target_lang, now, config.due_window_days)?;
        let used = self.used_combination_hashes(user_id)?;
        Ok(combine::unused_combinations(&items, &used, config, max))
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    /// Vocabulary statistics for one user
    pub fn stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<VocabularyStats> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;

        reader
            .query_row(
                "SELECT
                    COUNT(*),
                    SUM(CASE WHEN next_review_due_at <= ?2 THEN 1 ELSE 0 END),
                    SUM(CASE WHEN mastery_status = 'learning' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN mastery_status = 'learned' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN mastery_status = 'ready_to_use' THEN 1 ELSE 0 END),
                    AVG(stability),
                    MIN(created_at),
                    MAX(created_at)
                 FROM learning_items WHERE user_id = ?1",
                params![user_id, now.to_rfc3339()],
                |row| {
                    let oldest: Option<String> = row.get(6)?;
                    let newest: Option<String> = row.get(7)?;
                    Ok(VocabularyStats {
                        total_items: row.get(0)?,
                        items_due_for_review: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                        learning: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                        learned: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                        ready_to_use: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                        average_stability: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
                        oldest_capture: oldest.and_then(|s| {
                            DateTime::parse_from_rfc3339(&s)
                                .map(|dt| dt.with_timezone(&Utc))
                                .ok()
                        }),
                        newest_capture: newest.and_then(|s| {
                            DateTime::parse_from_rfc3339(&s)
                                .map(|dt| dt.with_timezone(&Utc))
                                .ok()
                        }),
                    })
                },
            )
            .map_err(StorageError::from)
    }

    // ========================================================================
    // ROW MAPPING
    // ========================================================================

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Invalid {} timestamp '{}': {}", field_name, value, e),
                    )),
                )
            })
    }

    /// Convert a row to LearningItem
    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<LearningItem> {
        let category: String = row.get("category")?;
        let mastery_status: String = row.get("mastery_status")?;

        let next_review_due_at: String = row.get("next_review_due_at")?;
        let last_reviewed_at: Option<String> = row.get("last_reviewed_at")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        let next_review_due_at = Self::parse_timestamp(&next_review_due_at, "next_review_due_at")?;
        let created_at = Self::parse_timestamp(&created_at, "created_at")?;
        let updated_at = Self::parse_timestamp(&updated_at, "updated_at")?;

        let last_reviewed_at = last_reviewed_at.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        Ok(LearningItem {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            original_text: row.get("original_text")?,
            translation: row.get("translation")?,
            source_lang: row.get("source_lang")?,
            target_lang: row.get("target_lang")?,
            category: Category::parse_name(&category),
            category_confidence: row.get("category_confidence")?,
            difficulty: row.get("difficulty")?,
            stability: row.get("stability")?,
            retrievability: row.get("retrievability")?,
            next_review_due_at,
            last_reviewed_at,
            review_count: row.get("review_count")?,
            lapse_count: row.get("lapse_count")?,
            consecutive_correct_sessions: row.get("consecutive_correct_sessions")?,
            last_correct_session_id: row.get("last_correct_session_id")?,
            mastery_status: MasteryStatus::parse_name(&mastery_status),
            audio_url: row.get("audio_url")?,
            created_at,
            updated_at,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
