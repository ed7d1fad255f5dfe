//! SQLite-based habit storage.
//!
//! Provides persistent storage for:
//! - Habits (name, presentation fields, archived flag)
//! - One log entry per habit per UTC day
//!
//! Writes go through [`HabitStore::write_entry`], which deletes an entry
//! instead of storing it when it is neither completed nor annotated.
//!
//! Log dates are stored as day numbers counted from 0001-01-01 (CE day 1), so
//! SQL ordering and range filters are numeric for every year chrono accepts.

use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::habit::{DateWindow, Habit, HabitLog, HabitLogEntry};

/// SQLite database for habits and their daily log.
pub struct HabitStore {
    conn: Connection,
}

impl HabitStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/mindgarden.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("mindgarden.db"))
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        tracing::debug!(path = %path.display(), "opened habit store");
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "PRAGMA foreign_keys = ON;

                CREATE TABLE IF NOT EXISTS habits (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    icon        TEXT,
                    color       TEXT,
                    archived    INTEGER NOT NULL DEFAULT 0,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS habit_logs (
                    habit_id    TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
                    date        INTEGER NOT NULL,
                    completed   INTEGER NOT NULL,
                    note        TEXT,
                    PRIMARY KEY (habit_id, date)
                );

                CREATE INDEX IF NOT EXISTS idx_habit_logs_date ON habit_logs(date);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Create and store a new active habit.
    pub fn create_habit(
        &self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Habit> {
        let mut habit = Habit::new(name, created_at);
        habit.icon = icon.map(str::to_string);
        habit.color = color.map(str::to_string);
        self.insert_habit(&habit)?;
        Ok(habit)
    }

    pub fn insert_habit(&self, habit: &Habit) -> Result<()> {
        self.conn.execute(
            "INSERT INTO habits (id, name, icon, color, archived, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id,
                habit.name,
                habit.icon,
                habit.color,
                habit.archived,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(habit_id = %habit.id, "created habit");
        Ok(())
    }

    /// # Errors
    /// Returns `HabitNotFound` if no habit has this id.
    pub fn get_habit(&self, id: &str) -> Result<Habit> {
        self.conn
            .query_row(
                "SELECT id, name, icon, color, archived, created_at FROM habits WHERE id = ?1",
                params![id],
                habit_from_row,
            )
            .optional()?
            .ok_or_else(|| not_found(id))
    }

    /// Habits in creation order, optionally including archived ones.
    pub fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, color, archived, created_at
             FROM habits
             WHERE ?1 OR archived = 0
             ORDER BY created_at, rowid",
        )?;
        let habits = stmt
            .query_map(params![include_archived], habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    pub fn set_archived(&self, id: &str, archived: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE habits SET archived = ?2 WHERE id = ?1",
            params![id, archived],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(habit_id = id, archived, "updated habit archive flag");
        Ok(())
    }

    /// Delete a habit and, by cascade, its log.
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(habit_id = id, "deleted habit");
        Ok(())
    }

    /// The stored entry for one day, if any.
    pub fn entry(&self, habit_id: &str, date: NaiveDate) -> Result<Option<HabitLogEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT date, completed, note FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
                params![habit_id, day_number(date)],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Store `entry`, or delete the day's row if the entry is not meaningful.
    /// Returns what is stored afterwards.
    pub fn write_entry(&self, habit_id: &str, entry: HabitLogEntry) -> Result<Option<HabitLogEntry>> {
        self.get_habit(habit_id)?;
        let date = day_number(entry.date);

        if entry.is_meaningful() {
            let note = entry.note.as_deref().filter(|n| !n.trim().is_empty());
            self.conn.execute(
                "INSERT INTO habit_logs (habit_id, date, completed, note)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(habit_id, date) DO UPDATE SET
                    completed = excluded.completed,
                    note = excluded.note",
                params![habit_id, date, entry.completed, note],
            )?;
            tracing::debug!(habit_id, date = %entry.date, completed = entry.completed, "wrote log entry");
            Ok(Some(HabitLogEntry {
                note: note.map(str::to_string),
                ..entry
            }))
        } else {
            self.conn.execute(
                "DELETE FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
                params![habit_id, date],
            )?;
            tracing::debug!(habit_id, date = %entry.date, "compacted log entry");
            Ok(None)
        }
    }

    /// Mark a day done or not done, keeping any note.
    pub fn set_completed(
        &self,
        habit_id: &str,
        date: NaiveDate,
        completed: bool,
    ) -> Result<Option<HabitLogEntry>> {
        let note = self.entry(habit_id, date)?.and_then(|e| e.note);
        self.write_entry(habit_id, HabitLogEntry { date, completed, note })
    }

    /// Flip a day's completion.
    pub fn toggle(&self, habit_id: &str, date: NaiveDate) -> Result<Option<HabitLogEntry>> {
        let current = self.entry(habit_id, date)?;
        let completed = !current.as_ref().is_some_and(|e| e.completed);
        self.write_entry(
            habit_id,
            HabitLogEntry {
                date,
                completed,
                note: current.and_then(|e| e.note),
            },
        )
    }

    /// Attach, replace, or clear (`None`) a day's note.
    pub fn set_note(
        &self,
        habit_id: &str,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<Option<HabitLogEntry>> {
        let completed = self.entry(habit_id, date)?.is_some_and(|e| e.completed);
        self.write_entry(
            habit_id,
            HabitLogEntry {
                date,
                completed,
                note: note.map(str::to_string),
            },
        )
    }

    /// All entries of a habit, oldest first.
    pub fn entries(&self, habit_id: &str) -> Result<Vec<HabitLogEntry>> {
        self.get_habit(habit_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT date, completed, note FROM habit_logs WHERE habit_id = ?1 ORDER BY date",
        )?;
        let entries = stmt
            .query_map(params![habit_id], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Entries inside `window`, oldest first.
    pub fn entries_in(&self, habit_id: &str, window: DateWindow) -> Result<Vec<HabitLogEntry>> {
        self.get_habit(habit_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT date, completed, note FROM habit_logs
             WHERE habit_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date",
        )?;
        let entries = stmt
            .query_map(
                params![habit_id, day_number(window.start()), day_number(window.end())],
                entry_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Snapshot of a habit's log for the engine, optionally windowed.
    pub fn log(&self, habit_id: &str, window: Option<DateWindow>) -> Result<HabitLog> {
        let entries = match window {
            Some(window) => self.entries_in(habit_id, window)?,
            None => self.entries(habit_id)?,
        };
        Ok(HabitLog::from_entries(entries)?)
    }
}

fn not_found(id: &str) -> crate::error::CoreError {
    DatabaseError::HabitNotFound { id: id.to_string() }.into()
}

fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| conversion_error(5, e))?
        .with_timezone(&Utc);
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
        archived: row.get(4)?,
        created_at,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HabitLogEntry> {
    let days: i32 = row.get(0)?;
    let date = NaiveDate::from_num_days_from_ce_opt(days)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(0, i64::from(days)))?;
    Ok(HabitLogEntry {
        date,
        completed: row.get(1)?,
        note: row.get(2)?,
    })
}
