//! Habit records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Part of the day a habit belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitCategory {
    #[default]
    Morning,
    Work,
    Fitness,
    Evening,
    Study,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 5] = [
        HabitCategory::Morning,
        HabitCategory::Work,
        HabitCategory::Fitness,
        HabitCategory::Evening,
        HabitCategory::Study,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Morning => "Morning",
            HabitCategory::Work => "Work",
            HabitCategory::Fitness => "Fitness",
            HabitCategory::Evening => "Evening",
            HabitCategory::Study => "Study",
        }
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HabitCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{s}'"),
            })
    }
}

/// A tracked habit. Completions are stored separately and never embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: HabitCategory,
    pub reminder_time: String, // HH:MM
    /// Image URL shown with the habit.
    pub image: Option<String>,
    /// Display-only attribution; not an account.
    pub creator_name: String,
    pub creator_email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating or updating a habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: HabitCategory,
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub creator_email: String,
}

fn default_reminder_time() -> String {
    "08:00".into()
}

impl NewHabit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: HabitCategory::default(),
            reminder_time: default_reminder_time(),
            image: None,
            creator_name: String::new(),
            creator_email: String::new(),
        }
    }

    /// Trim text fields and normalize the reminder to `HH:MM`.
    ///
    /// A blank image becomes `None`. The description may be empty.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::EmptyField("title".into()));
        }
        self.description = self.description.trim().to_string();
        self.reminder_time = normalize_reminder(&self.reminder_time)?;
        self.image = self
            .image
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &self.image {
            validate_image_url(url)?;
        }
        self.creator_name = self.creator_name.trim().to_string();
        self.creator_email = self.creator_email.trim().to_string();
        if !self.creator_email.is_empty() && !self.creator_email.contains('@') {
            return Err(ValidationError::InvalidValue {
                field: "creator_email".into(),
                message: format!("'{}' is not an email address", self.creator_email),
            });
        }
        Ok(self)
    }
}

fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: "image".into(),
            message: format!("expected an http(s) URL, got '{url}'"),
        })
    }
}

fn normalize_reminder(raw: &str) -> Result<String, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| ValidationError::InvalidValue {
            field: "reminder_time".into(),
            message: format!("expected HH:MM, got '{raw}'"),
        })
}
