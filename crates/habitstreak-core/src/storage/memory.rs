//! In-process completion store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::CompletionStore;
use crate::error::Result;
use crate::streak::{AppendOutcome, CompletionHistory, CompletionRecorder};

/// Completion histories kept in memory behind a single mutex.
///
/// Holding the lock across read, decide and append is what makes
/// `record_completion` atomic here.
#[derive(Debug, Default)]
pub struct MemoryStore {
    histories: Mutex<HashMap<String, CompletionHistory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a habit with an existing history, replacing any previous one.
    pub fn insert_history(&self, habit_id: &str, history: CompletionHistory) {
        self.lock().insert(habit_id.to_string(), history);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CompletionHistory>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.histories
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CompletionStore for MemoryStore {
    fn history(&self, habit_id: &str) -> Result<CompletionHistory> {
        Ok(self.lock().get(habit_id).cloned().unwrap_or_default())
    }

    fn record_completion(&self, habit_id: &str, now: DateTime<Utc>) -> Result<AppendOutcome> {
        let mut histories = self.lock();
        let history = histories.entry(habit_id.to_string()).or_default();
        let outcome = CompletionRecorder::append(history, now);
        if outcome.is_appended() {
            tracing::info!(habit_id, %now, "completion recorded");
        }
        Ok(outcome)
    }
}
