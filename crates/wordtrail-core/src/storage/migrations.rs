//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: items, review sessions, generated sentences",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Composite due-date index for combination windows, sentence audio",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS learning_items (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    original_text TEXT NOT NULL,
    translation TEXT NOT NULL,
    source_lang TEXT NOT NULL,
    target_lang TEXT NOT NULL,

    -- Categorization (fixed 8-entry taxonomy)
    category TEXT NOT NULL DEFAULT 'other',
    category_confidence REAL NOT NULL DEFAULT 0.5,

    -- FSRS state
    difficulty REAL NOT NULL DEFAULT 5.0,
    stability REAL NOT NULL DEFAULT 1.0,
    retrievability REAL NOT NULL DEFAULT 1.0,
    next_review_due_at TEXT NOT NULL,
    last_reviewed_at TEXT,
    review_count INTEGER NOT NULL DEFAULT 0,
    lapse_count INTEGER NOT NULL DEFAULT 0,

    -- Mastery tracking (3 correct sessions rule)
    consecutive_correct_sessions INTEGER NOT NULL DEFAULT 0,
    last_correct_session_id TEXT,
    mastery_status TEXT NOT NULL DEFAULT 'learning',

    -- Collaborator output
    audio_url TEXT,

    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_user ON learning_items(user_id);
CREATE INDEX IF NOT EXISTS idx_items_next_review ON learning_items(next_review_due_at);
CREATE INDEX IF NOT EXISTS idx_items_user_category ON learning_items(user_id, category);

CREATE TABLE IF NOT EXISTS review_sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    started_at TEXT NOT NULL,
    ended_at TEXT,
    words_reviewed INTEGER NOT NULL DEFAULT 0,
    correct_count INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_sessions_user_started ON review_sessions(user_id, started_at);

-- Doubles as the per-user used-combination log via combination_hash
CREATE TABLE IF NOT EXISTS generated_sentences (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    text TEXT NOT NULL,
    translation TEXT NOT NULL,
    item_ids TEXT NOT NULL DEFAULT '[]',
    combination_hash TEXT NOT NULL,
    exercise_type TEXT NOT NULL DEFAULT 'multiple_choice',
    is_valid INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sentences_user_hash ON generated_sentences(user_id, combination_hash);

INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: combination-window query support and sentence audio
const MIGRATION_V2_UP: &str = r#"
CREATE INDEX IF NOT EXISTS idx_items_user_due ON learning_items(user_id, next_review_due_at);

ALTER TABLE generated_sentences ADD COLUMN audio_url TEXT;

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            // execute_batch handles the multi-statement SQL
            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
