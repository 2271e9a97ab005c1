//! Streak and completion-rate computation.
//!
//! Both computations are pure functions of `(history, now)`. Nothing here
//! reads the system clock; callers inject `now`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::day::CalendarDay;
use super::history::CompletionHistory;

/// Default trailing window for the completion rate.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Longest accepted completion-rate window.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Derived metrics for one habit at one instant. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitProgress {
    pub current_streak: u32,
    pub progress_percent: u8,
    pub completed_today: bool,
    pub last_completed: Option<CalendarDay>,
    /// Distinct completed days over the whole history.
    pub distinct_days: usize,
}

/// Computes streaks and completion rates over a completion history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakEngine {
    window_days: u32,
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl StreakEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom completion-rate window, clamped to
    /// `1..=MAX_WINDOW_DAYS`.
    pub fn with_window(window_days: u32) -> Self {
        Self {
            window_days: window_days.clamp(1, MAX_WINDOW_DAYS),
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Number of consecutive completed days ending today or yesterday.
    ///
    /// Returns 0 when the most recent completion is older than yesterday,
    /// whatever lies further back. A gap inside the history truncates the
    /// count at that point.
    pub fn compute_streak(&self, history: &CompletionHistory, now: DateTime<Utc>) -> u32 {
        if history.is_empty() {
            return 0;
        }

        // BTreeSet iterates ascending; walk it from the newest day.
        let days = history.distinct_days();
        let mut newest_first = days.iter().rev();
        let Some(&most_recent) = newest_first.next() else {
            return 0;
        };

        let today = CalendarDay::of(now);
        // Future-dated completions count as today.
        let gap = most_recent.days_until(today).max(0);
        if gap > 1 {
            tracing::debug!(%most_recent, %today, gap, "streak broken");
            return 0;
        }

        let mut streak = 1u32;
        let mut previous = most_recent;
        for &current in newest_first {
            if current.days_until(previous) != 1 {
                break;
            }
            streak += 1;
            previous = current;
        }

        tracing::debug!(%most_recent, streak, "computed streak");
        streak
    }

    /// Percentage of the trailing window on which the habit was completed.
    ///
    /// The window is `[now - window_days, now]` with both bounds inclusive.
    /// Because that span can touch `window_days + 1` calendar days, the
    /// result is clamped to 100.
    pub fn compute_progress(&self, history: &CompletionHistory, now: DateTime<Utc>) -> u8 {
        // `None` only near chrono's minimum date: no lower bound then.
        let cutoff = now.checked_sub_signed(Duration::days(i64::from(self.window_days)));
        let in_window: std::collections::BTreeSet<CalendarDay> = history
            .events()
            .iter()
            .filter(|e| cutoff.map_or(true, |c| e.at >= c) && e.at <= now)
            .map(|e| e.day())
            .collect();

        let count = in_window.len() as u64;
        let window = u64::from(self.window_days);
        // Integer half-up rounding of count / window * 100.
        let percent = (count * 200 + window) / (window * 2);
        let percent = percent.min(100) as u8;

        tracing::debug!(count, window, percent, "computed progress");
        percent
    }

    pub fn summarize(&self, history: &CompletionHistory, now: DateTime<Utc>) -> HabitProgress {
        HabitProgress {
            current_streak: self.compute_streak(history, now),
            progress_percent: self.compute_progress(history, now),
            completed_today: history.contains_day(CalendarDay::of(now)),
            last_completed: history.last_completed(),
            distinct_days: history.distinct_days().len(),
        }
    }
}

/// [`StreakEngine::compute_streak`] with the default engine.
pub fn compute_streak(history: &CompletionHistory, now: DateTime<Utc>) -> u32 {
    StreakEngine::default().compute_streak(history, now)
}

/// [`StreakEngine::compute_progress`] with the default 30-day window.
pub fn compute_progress(history: &CompletionHistory, now: DateTime<Utc>) -> u8 {
    StreakEngine::default().compute_progress(history, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::CompletionEvent;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn history(raw: &[&str]) -> CompletionHistory {
        CompletionHistory::parse(raw).unwrap()
    }

    fn now() -> DateTime<Utc> {
        utc("2024-03-10T08:00:00Z")
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(compute_streak(&CompletionHistory::empty(), now()), 0);
        assert_eq!(compute_progress(&CompletionHistory::empty(), now()), 0);
    }

    #[test]
    fn yesterday_anchored_streak_with_duplicates() {
        let h = history(&[
            "2024-03-09T23:00:00Z",
            "2024-03-08T01:00:00Z",
            "2024-03-08T22:00:00Z",
        ]);
        assert_eq!(compute_streak(&h, now()), 2);
    }

    #[test]
    fn stale_completion_breaks_streak() {
        let h = history(&["2024-03-01T00:00:00Z"]);
        assert_eq!(compute_streak(&h, now()), 0);
    }

    #[test]
    fn two_days_ago_is_already_broken() {
        let h = history(&["2024-03-08T23:59:59Z", "2024-03-07T10:00:00Z"]);
        assert_eq!(compute_streak(&h, now()), 0);
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        let h = history(&[
            "2024-03-08T12:00:00Z",
            "2024-03-10T07:00:00Z",
            "2024-03-09T12:00:00Z",
        ]);
        assert_eq!(compute_streak(&h, now()), 3);
    }

    #[test]
    fn gap_truncates_the_walk() {
        let h = history(&["2024-03-10T07:00:00Z", "2024-03-08T12:00:00Z"]);
        assert_eq!(compute_streak(&h, now()), 1);

        let h = history(&[
            "2024-03-10T01:00:00Z",
            "2024-03-09T01:00:00Z",
            "2024-03-06T01:00:00Z",
            "2024-03-05T01:00:00Z",
            "2024-03-04T01:00:00Z",
        ]);
        assert_eq!(compute_streak(&h, now()), 2);
    }

    #[test]
    fn same_day_completions_count_once() {
        let h = history(&["2024-03-10T00:00:01Z", "2024-03-10T07:59:00Z"]);
        assert_eq!(compute_streak(&h, now()), 1);
    }

    #[test]
    fn future_completion_is_clamped_to_today() {
        let h = history(&["2024-03-12T09:00:00Z", "2024-03-11T09:00:00Z"]);
        assert_eq!(compute_streak(&h, now()), 2);
    }

    #[test]
    fn unsorted_input_is_handled() {
        let h = history(&[
            "2024-03-07T12:00:00Z",
            "2024-03-10T06:00:00Z",
            "2024-03-08T12:00:00Z",
            "2024-03-09T12:00:00Z",
        ]);
        assert_eq!(compute_streak(&h, now()), 4);
    }

    #[test]
    fn progress_window_lower_bound_is_inclusive() {
        let exactly_30 = CompletionHistory::new(vec![CompletionEvent::at(
            now() - Duration::days(30),
        )]);
        assert_eq!(compute_progress(&exactly_30, now()), 3);

        let thirty_one = CompletionHistory::new(vec![CompletionEvent::at(
            now() - Duration::days(31),
        )]);
        assert_eq!(compute_progress(&thirty_one, now()), 0);
    }

    #[test]
    fn progress_counts_distinct_days() {
        let h = history(&[
            "2024-03-09T23:00:00Z",
            "2024-03-08T01:00:00Z",
            "2024-03-08T22:00:00Z",
        ]);
        // 2 / 30 = 6.67%
        assert_eq!(compute_progress(&h, now()), 7);
    }

    #[test]
    fn progress_rounds_half_up() {
        // 15 / 30 = 50%, 1 / 8 = 12.5% -> 13
        let h: CompletionHistory = (0..15)
            .map(|d| CompletionEvent::at(now() - Duration::days(d)))
            .collect();
        assert_eq!(compute_progress(&h, now()), 50);

        let one = history(&["2024-03-10T01:00:00Z"]);
        assert_eq!(StreakEngine::with_window(8).compute_progress(&one, now()), 13);
    }

    #[test]
    fn progress_is_clamped_to_100() {
        // 31 distinct calendar days fit in [now - 30d, now].
        let h: CompletionHistory = (0..=30)
            .map(|d| CompletionEvent::at(now() - Duration::days(d)))
            .collect();
        assert_eq!(h.distinct_days().len(), 31);
        assert_eq!(compute_progress(&h, now()), 100);
    }

    #[test]
    fn progress_ignores_future_events() {
        let h = history(&["2024-03-11T08:00:00Z"]);
        assert_eq!(compute_progress(&h, now()), 0);
    }

    #[test]
    fn zero_window_is_treated_as_one_day() {
        let engine = StreakEngine::with_window(0);
        assert_eq!(engine.window_days(), 1);
        let h = history(&["2024-03-10T07:00:00Z"]);
        assert_eq!(engine.compute_progress(&h, now()), 100);
    }

    #[test]
    fn oversized_window_is_clamped() {
        let engine = StreakEngine::with_window(u32::MAX);
        assert_eq!(engine.window_days(), MAX_WINDOW_DAYS);
        let h = history(&["2024-03-10T07:00:00Z"]);
        // 1 / 365 rounds to 0
        assert_eq!(engine.compute_progress(&h, now()), 0);

        let year: CompletionHistory = (0..365)
            .map(|d| CompletionEvent::at(now() - Duration::days(d)))
            .collect();
        assert_eq!(engine.compute_progress(&year, now()), 100);
    }

    #[test]
    fn window_reaching_past_the_earliest_date_has_no_lower_bound() {
        let early = DateTime::<Utc>::MIN_UTC + Duration::days(10);
        let h = CompletionHistory::new(vec![CompletionEvent::at(DateTime::<Utc>::MIN_UTC)]);
        // 1 / 30 = 3.3%
        assert_eq!(StreakEngine::with_window(30).compute_progress(&h, early), 3);
    }

    #[test]
    fn summarize_bundles_everything() {
        let h = history(&[
            "2024-03-10T07:00:00Z",
            "2024-03-09T12:00:00Z",
            "2024-02-01T12:00:00Z",
        ]);
        let summary = StreakEngine::default().summarize(&h, now());
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.progress_percent, 7);
        assert!(summary.completed_today);
        assert_eq!(summary.last_completed.unwrap().key(), "2024-03-10");
        assert_eq!(summary.distinct_days, 3);
    }
}
