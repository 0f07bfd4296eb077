//! Spaced Repetition Module
//!
//! FSRS-style scheduling built on the power-law forgetting curve.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki
//!
//! ## Core formula
//!
//! Retrievability: `R(t) = (1 + t / (9 * S))^-1`
//!
//! where stability S is defined as the number of days until R decays to
//! exactly 0.9. The scheduler revises S after every rating and derives the
//! next due date as `round(S)` days out, clamped to `[1, MAX_INTERVAL_DAYS]`.

mod retention;
mod scheduler;

pub use retention::{
    days_between,
    // Core function
    retrievability,
    // Constants
    DESIRED_RETENTION,
    MAX_DIFFICULTY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
};

pub use scheduler::{mastery_for, process_review, Rating, ScheduleUpdate, MAX_INTERVAL_DAYS};
