mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::{Config, OutputConfig, ProgressConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::streak::{AppendOutcome, CompletionHistory};

/// Persistence collaborator for completion events.
///
/// Implementations must make [`record_completion`](Self::record_completion)
/// linearizable per habit: two concurrent calls for the same habit on the
/// same calendar day yield exactly one `Appended`.
pub trait CompletionStore {
    /// All completion events recorded for `habit_id`, in no particular order.
    fn history(&self, habit_id: &str) -> Result<CompletionHistory>;

    /// Read the history, decide with
    /// [`CompletionRecorder`](crate::streak::CompletionRecorder), and persist
    /// the new event if one was produced, all as one atomic step.
    fn record_completion(&self, habit_id: &str, now: DateTime<Utc>) -> Result<AppendOutcome>;
}

/// Returns the data directory, creating it if needed.
///
/// `HABITSTREAK_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/habitstreak/`, or `~/.config/habitstreak-dev/` when
/// `HABITSTREAK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HABITSTREAK_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("habitstreak-dev")
            } else {
                base_dir.join("habitstreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
