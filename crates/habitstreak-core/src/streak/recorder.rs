//! The one-completion-per-day decision.
//!
//! [`CompletionRecorder::try_append`] only decides. Making read-decide-write
//! atomic per habit is the job of the store that calls it
//! (see [`crate::storage::CompletionStore`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::day::CalendarDay;
use super::history::{CompletionEvent, CompletionHistory};

/// Result of attempting to complete a habit.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AppendOutcome {
    /// A new event that the caller must persist.
    Appended(CompletionEvent),
    /// The habit already has a completion on this day; nothing to persist.
    AlreadyCompletedToday { day: CalendarDay },
}

impl AppendOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, AppendOutcome::Appended(_))
    }

    pub fn event(&self) -> Option<CompletionEvent> {
        match self {
            AppendOutcome::Appended(event) => Some(*event),
            AppendOutcome::AlreadyCompletedToday { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionRecorder;

impl CompletionRecorder {
    pub fn try_append(history: &CompletionHistory, now: DateTime<Utc>) -> AppendOutcome {
        let today = CalendarDay::of(now);
        if history.contains_day(today) {
            tracing::debug!(%today, "habit already completed today");
            return AppendOutcome::AlreadyCompletedToday { day: today };
        }
        AppendOutcome::Appended(CompletionEvent::at(now))
    }

    /// Decide and, on success, append to an in-memory history.
    pub fn append(history: &mut CompletionHistory, now: DateTime<Utc>) -> AppendOutcome {
        let outcome = Self::try_append(history, now);
        if let AppendOutcome::Appended(event) = outcome {
            history.push(event);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::compute_streak;
    use chrono::Duration;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn first_completion_is_appended_at_now() {
        let now = utc("2024-03-10T08:00:00Z");
        let outcome = CompletionRecorder::try_append(&CompletionHistory::empty(), now);
        assert_eq!(outcome, AppendOutcome::Appended(CompletionEvent::at(now)));
    }

    #[test]
    fn second_completion_same_now_is_rejected() {
        let now = utc("2024-03-10T08:00:00Z");
        let mut history = CompletionHistory::empty();

        assert!(CompletionRecorder::append(&mut history, now).is_appended());
        let second = CompletionRecorder::append(&mut history, now);
        assert_eq!(
            second,
            AppendOutcome::AlreadyCompletedToday {
                day: CalendarDay::of(now)
            }
        );
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn later_the_same_utc_day_is_still_a_duplicate() {
        let morning = utc("2024-03-10T00:00:00Z");
        let night = utc("2024-03-10T23:59:59Z");
        let history = CompletionHistory::new(vec![CompletionEvent::at(morning)]);
        let outcome = CompletionRecorder::try_append(&history, night);
        assert!(!outcome.is_appended());
        assert!(outcome.event().is_none());
    }

    #[test]
    fn next_day_extends_the_streak() {
        let day1 = utc("2024-03-09T21:00:00Z");
        let day2 = day1 + Duration::hours(4);
        let mut history = CompletionHistory::empty();
        assert!(CompletionRecorder::append(&mut history, day1).is_appended());
        assert!(CompletionRecorder::append(&mut history, day2).is_appended());
        assert_eq!(compute_streak(&history, day2), 2);
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(AppendOutcome::AlreadyCompletedToday {
            day: CalendarDay::of(utc("2024-03-10T08:00:00Z")),
        })
        .unwrap();
        assert_eq!(json["outcome"], "already_completed_today");
        assert_eq!(json["day"], "2024-03-10");
    }
}
