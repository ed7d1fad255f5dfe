//! Habits and their per-day log entries.
//!
//! A habit owns at most one [`HabitLogEntry`] per calendar day. An entry that
//! is not completed and carries no note means the same thing as no entry at
//! all, so writers delete such entries and [`HabitLog`] drops them on
//! construction.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A tracked behavior.
///
/// Icon and color are presentation only; the engine never looks at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Archived habits are excluded from active computation.
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new, active habit with a fresh id.
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            icon: None,
            color: None,
            archived: false,
            created_at,
        }
    }
}

/// One calendar-day record for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLogEntry {
    /// UTC calendar day.
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl HabitLogEntry {
    pub fn completed(date: NaiveDate) -> Self {
        Self {
            date,
            completed: true,
            note: None,
        }
    }

    pub fn missed(date: NaiveDate) -> Self {
        Self {
            date,
            completed: false,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether a non-blank note is attached.
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// False when the entry is indistinguishable from having no entry:
    /// not completed and no note.
    pub fn is_meaningful(&self) -> bool {
        self.completed || self.has_note()
    }
}

/// The log entries of a single habit, keyed by calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitLog {
    entries: HashMap<NaiveDate, HabitLogEntry>,
    earliest: Option<NaiveDate>,
}

impl HabitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from a snapshot of entries.
    ///
    /// Entries that are neither completed nor annotated are dropped. Two
    /// entries on the same day are rejected, even if one of them would have
    /// been dropped.
    pub fn from_entries<I>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = HabitLogEntry>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut log = Self::new();

        for entry in entries {
            if !seen.insert(entry.date) {
                return Err(ValidationError::DuplicateEntry { date: entry.date });
            }
            if entry.is_meaningful() {
                log.insert(entry);
            }
        }

        Ok(log)
    }

    /// Build a log from the days on which the habit was completed.
    pub fn from_completed_days<I>(days: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self::from_entries(days.into_iter().map(HabitLogEntry::completed))
    }

    fn insert(&mut self, entry: HabitLogEntry) {
        let date = entry.date;
        self.earliest = Some(self.earliest.map_or(date, |d| d.min(date)));
        self.entries.insert(date, entry);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&HabitLogEntry> {
        self.entries.get(&date)
    }

    /// True iff there is a completed entry on `date`.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.entries.get(&date).is_some_and(|e| e.completed)
    }

    /// Earliest day with an entry, if any.
    pub fn earliest(&self) -> Option<NaiveDate> {
        self.earliest
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &HabitLogEntry> {
        self.entries.values()
    }
}
