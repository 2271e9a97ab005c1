//! Streak engine and completion recorder.
//!
//! - [`CompletionHistory`]: raw completion events of one habit, unordered
//! - [`StreakEngine`]: current streak and trailing completion rate
//! - [`CompletionRecorder`]: decides whether a completion may be appended today

mod day;
mod engine;
mod history;
mod recorder;

pub use day::CalendarDay;
pub use engine::{
    compute_progress, compute_streak, HabitProgress, StreakEngine, DEFAULT_WINDOW_DAYS,
    MAX_WINDOW_DAYS,
};
pub use history::{CompletionEvent, CompletionHistory};
pub use recorder::{AppendOutcome, CompletionRecorder};
