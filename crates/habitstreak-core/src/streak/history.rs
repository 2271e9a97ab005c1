//! Completion events and the per-habit history they form.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::day::CalendarDay;
use crate::error::StreakError;

/// One act of marking a habit complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub at: DateTime<Utc>,
}

impl CompletionEvent {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { at: instant }
    }

    /// Parse an RFC 3339 timestamp, normalizing any offset to UTC.
    pub fn parse(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| Self::at(dt.with_timezone(&Utc)))
    }

    pub fn day(&self) -> CalendarDay {
        CalendarDay::of(self.at)
    }
}

/// Unordered completion events belonging to a single habit.
///
/// Duplicates on the same calendar day are allowed here and collapse during
/// computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionHistory {
    events: Vec<CompletionEvent>,
}

impl CompletionHistory {
    pub fn new(events: Vec<CompletionEvent>) -> Self {
        Self { events }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a history from raw timestamp strings.
    ///
    /// Fails on the first entry that is not a valid RFC 3339 timestamp.
    pub fn parse<I, S>(raw: I) -> Result<Self, StreakError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let events = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let value = value.as_ref();
                CompletionEvent::parse(value).ok_or_else(|| StreakError::InvalidTimestamp {
                    index,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { events })
    }

    /// Build a history from a JSON document such as `["2024-03-09T23:00:00Z"]`.
    ///
    /// A `null` or blank document is an empty history. `null` or non-string
    /// entries inside the array are rejected.
    pub fn from_json(json: &str) -> Result<Self, StreakError> {
        if json.trim().is_empty() {
            return Ok(Self::empty());
        }
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|_| StreakError::InvalidTimestamp {
                index: 0,
                value: json.to_string(),
            })?;
        let items = match value {
            serde_json::Value::Null => return Ok(Self::empty()),
            serde_json::Value::Array(items) => items,
            other => {
                return Err(StreakError::InvalidTimestamp {
                    index: 0,
                    value: other.to_string(),
                })
            }
        };

        let mut events = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let event = item
                .as_str()
                .and_then(CompletionEvent::parse)
                .ok_or_else(|| StreakError::InvalidTimestamp {
                    index,
                    value: item.to_string(),
                })?;
            events.push(event);
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[CompletionEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: CompletionEvent) {
        self.events.push(event);
    }

    pub fn distinct_days(&self) -> BTreeSet<CalendarDay> {
        self.events.iter().map(CompletionEvent::day).collect()
    }

    pub fn contains_day(&self, day: CalendarDay) -> bool {
        self.events.iter().any(|e| e.day() == day)
    }

    pub fn last_completed(&self) -> Option<CalendarDay> {
        self.events.iter().map(CompletionEvent::day).max()
    }
}

impl From<Vec<CompletionEvent>> for CompletionHistory {
    fn from(events: Vec<CompletionEvent>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<CompletionEvent> for CompletionHistory {
    fn from_iter<T: IntoIterator<Item = CompletionEvent>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
