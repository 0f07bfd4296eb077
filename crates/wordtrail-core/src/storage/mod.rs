//! Storage Module
//!
//! SQLite-based item store with:
//! - Learning items and their full scheduling state
//! - Review-session bookkeeping (2-hour boundary)
//! - Generated-sentence history doubling as the used-combination log

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{Result, ReviewSession, Storage, StorageError, SESSION_BOUNDARY_HOURS};
