//! # habitstreak Core Library
//!
//! Tracks recurring habits and rewards consistency with a *current streak*:
//! the number of consecutive UTC calendar days, ending today or yesterday,
//! on which a habit was completed. All behaviour is exposed through this
//! library; the `habitstreak` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Streak Engine**: pure functions of `(history, now)` computing the current
//!   streak and the trailing completion rate
//! - **Completion Recorder**: the at-most-one-completion-per-day decision
//! - **Storage**: SQLite habit/completion storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: streak and progress computation
//! - [`CompletionRecorder`]: append decision for a new completion
//! - [`CompletionStore`]: atomic read-decide-write contract for storage
//! - [`Database`]: SQLite implementation of the store plus habit records
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, StreakError, ValidationError};
pub use events::Event;
pub use habit::{Habit, HabitCategory, NewHabit};
pub use storage::{CompletionStore, Config, Database, MemoryStore};
pub use streak::{
    compute_progress, compute_streak, AppendOutcome, CalendarDay, CompletionEvent,
    CompletionHistory, CompletionRecorder, HabitProgress, StreakEngine,
};
