//! SQLite-based habit and completion storage.
//!
//! Provides persistent storage for:
//! - Habit records
//! - The append-only completion log, at most one row per habit per UTC day

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use uuid::Uuid;

use super::{data_dir, migrations, CompletionStore};
use crate::error::{CoreError, DatabaseError, Result, StreakError, ValidationError};
use crate::habit::{Habit, HabitCategory, NewHabit};
use crate::streak::{AppendOutcome, CompletionEvent, CompletionHistory, CompletionRecorder};

/// How long a writer waits for another connection's transaction.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database for habits and their completions.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/habitstreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("habitstreak.db"))
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Habits ===

    pub fn create_habit(&self, new: NewHabit, now: DateTime<Utc>) -> Result<Habit> {
        let new = new.validated()?;
        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            category: new.category,
            reminder_time: new.reminder_time,
            image: new.image,
            creator_name: new.creator_name,
            creator_email: new.creator_email,
            created_at: now,
        };
        self.conn.execute(
            "INSERT INTO habits (id, title, description, category, reminder_time,
                                 image, creator_name, creator_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                habit.id,
                habit.title,
                habit.description,
                habit.category.as_str(),
                habit.reminder_time,
                habit.image,
                habit.creator_name,
                habit.creator_email,
                format_instant(habit.created_at),
            ],
        )?;
        tracing::info!(habit_id = %habit.id, title = %habit.title, "habit created");
        Ok(habit)
    }

    pub fn get_habit(&self, id: &str) -> Result<Habit> {
        self.conn
            .query_row(
                "SELECT id, title, description, category, reminder_time,
                        image, creator_name, creator_email, created_at
                 FROM habits WHERE id = ?1",
                params![id],
                row_to_habit,
            )
            .optional()?
            .ok_or_else(|| CoreError::HabitNotFound(id.to_string()))
    }

    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, category, reminder_time,
                    image, creator_name, creator_email, created_at
             FROM habits ORDER BY created_at, title",
        )?;
        let habits = stmt
            .query_map([], row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    /// Replace the editable fields of a habit. The creator fields and
    /// completions are untouched.
    pub fn update_habit(&self, id: &str, changes: NewHabit) -> Result<Habit> {
        let changes = changes.validated()?;
        let updated = self.conn.execute(
            "UPDATE habits
             SET title = ?2, description = ?3, category = ?4, reminder_time = ?5, image = ?6
             WHERE id = ?1",
            params![
                id,
                changes.title,
                changes.description,
                changes.category.as_str(),
                changes.reminder_time,
                changes.image,
            ],
        )?;
        if updated == 0 {
            return Err(CoreError::HabitNotFound(id.to_string()));
        }
        tracing::info!(habit_id = id, "habit updated");
        self.get_habit(id)
    }

    /// Delete a habit and its completions in a single transaction.
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM completions WHERE habit_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(CoreError::HabitNotFound(id.to_string()));
        }
        tx.commit()?;
        tracing::info!(habit_id = id, "habit deleted");
        Ok(())
    }

    fn ensure_habit(conn: &Connection, id: &str) -> Result<()> {
        let exists = conn
            .query_row("SELECT 1 FROM habits WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(CoreError::HabitNotFound(id.to_string()))
        }
    }

    fn load_history(conn: &Connection, habit_id: &str) -> Result<CompletionHistory> {
        let mut stmt = conn.prepare(
            "SELECT completed_at FROM completions WHERE habit_id = ?1 ORDER BY id",
        )?;
        let raw = stmt
            .query_map(params![habit_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let history = CompletionHistory::parse(&raw).map_err(|e| {
            let StreakError::InvalidTimestamp { index, ref value } = e;
            tracing::warn!(habit_id, index, value = %value, "corrupt completion row");
            e
        })?;
        Ok(history)
    }
}

impl CompletionStore for Database {
    fn history(&self, habit_id: &str) -> Result<CompletionHistory> {
        Self::ensure_habit(&self.conn, habit_id)?;
        Self::load_history(&self.conn, habit_id)
    }

    fn record_completion(&self, habit_id: &str, now: DateTime<Utc>) -> Result<AppendOutcome> {
        // IMMEDIATE takes the write lock up front, so a second writer waits
        // for this decision instead of reading a stale history.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        Self::ensure_habit(&tx, habit_id)?;
        let history = Self::load_history(&tx, habit_id)?;

        let outcome = CompletionRecorder::try_append(&history, now);
        let AppendOutcome::Appended(event) = outcome else {
            return Ok(outcome);
        };

        let inserted = tx.execute(
            "INSERT INTO completions (habit_id, completed_at, day) VALUES (?1, ?2, ?3)",
            params![habit_id, format_instant(event.at), event.day().key()],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                tracing::warn!(habit_id, day = %event.day(), "completion raced with another writer");
                return Ok(AppendOutcome::AlreadyCompletedToday { day: event.day() });
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit()?;

        tracing::info!(habit_id, day = %event.day(), "completion recorded");
        Ok(outcome)
    }
}

fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn row_to_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let category: String = row.get(3)?;
    let created_at: String = row.get(8)?;
    Ok(Habit {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: category.parse::<HabitCategory>().map_err(|e: ValidationError| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
        })?,
        reminder_time: row.get(4)?,
        image: row.get(5)?,
        creator_name: row.get(6)?,
        creator_email: row.get(7)?,
        created_at: CompletionEvent::parse(&created_at)
            .map(|e| e.at)
            .ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    8,
                    rusqlite::types::Type::Text,
                    format!("invalid created_at '{created_at}'").into(),
                )
            })?,
    })
}
