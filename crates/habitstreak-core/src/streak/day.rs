//! Calendar-day normalization.
//!
//! Every instant is reduced to its UTC date. The same reduction is used when
//! recording a completion and when computing streaks, so a completion at
//! 23:30 in a UTC-5 zone belongs to the *next* UTC day. That is a known
//! limitation near local midnight; switching to local time would have to
//! change the storage deduplication key as well.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date-only representation of an instant, truncated in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Signed number of whole days from `self` to `later`.
    ///
    /// Negative when `later` is actually earlier.
    pub fn days_until(&self, later: CalendarDay) -> i64 {
        (later.0 - self.0).num_days()
    }

    /// `YYYY-MM-DD`, the key used for per-day uniqueness in storage.
    pub fn key(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<DateTime<Utc>> for CalendarDay {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::of(instant)
    }
}
