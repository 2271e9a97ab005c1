use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::streak::{AppendOutcome, CalendarDay};

/// Every state change made through the store produces an Event.
/// The CLI prints them; embedders can forward them elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCreated {
        habit: Habit,
        at: DateTime<Utc>,
    },
    HabitUpdated {
        habit: Habit,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        habit_id: String,
        at: DateTime<Utc>,
    },
    /// A completion was persisted for `day`.
    CompletionRecorded {
        habit_id: String,
        day: CalendarDay,
        at: DateTime<Utc>,
    },
    /// A completion was requested but the day was already covered.
    CompletionAlreadyRecorded {
        habit_id: String,
        day: CalendarDay,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Event describing the outcome of a completion attempt made at `at`.
    pub fn from_outcome(habit_id: &str, outcome: AppendOutcome, at: DateTime<Utc>) -> Self {
        match outcome {
            AppendOutcome::Appended(event) => Event::CompletionRecorded {
                habit_id: habit_id.to_string(),
                day: event.day(),
                at: event.at,
            },
            AppendOutcome::AlreadyCompletedToday { day } => Event::CompletionAlreadyRecorded {
                habit_id: habit_id.to_string(),
                day,
                at,
            },
        }
    }
}
