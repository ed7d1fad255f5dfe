//! Habit management and daily logging commands.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use mindgarden_core::{HabitLogEntry, HabitStore};
use serde::Serialize;

use super::{print_json, today_or};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Display name
        name: String,
        /// Icon name or emoji
        #[arg(long)]
        icon: Option<String>,
        /// Color, e.g. "#22c55e"
        #[arg(long)]
        color: Option<String>,
    },
    /// List habits
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Archive a habit (excluded from the dashboard)
    Archive {
        /// Habit ID
        id: String,
    },
    /// Restore an archived habit
    Unarchive {
        /// Habit ID
        id: String,
    },
    /// Delete a habit and its whole log
    Delete {
        /// Habit ID
        id: String,
    },
    /// Mark a day as done
    Done {
        /// Habit ID
        id: String,
        /// Day to log (YYYY-MM-DD, default: today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mark a day as not done
    Undo {
        /// Habit ID
        id: String,
        /// Day to log (YYYY-MM-DD, default: today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Flip a day between done and not done
    Toggle {
        /// Habit ID
        id: String,
        /// Day to log (YYYY-MM-DD, default: today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Attach a note to a day; omit the text to clear it
    Note {
        /// Habit ID
        id: String,
        /// Note text
        text: Option<String>,
        /// Day to annotate (YYYY-MM-DD, default: today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Result of a log write. `entry` is absent when the day was compacted away.
#[derive(Serialize)]
struct LogResult<'a> {
    habit_id: &'a str,
    date: NaiveDate,
    entry: Option<HabitLogEntry>,
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = HabitStore::open()?;

    match action {
        HabitAction::Add { name, icon, color } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("habit name must not be empty".into());
            }
            let habit = store.create_habit(name, icon.as_deref(), color.as_deref(), Utc::now())?;
            print_json(&habit)?;
        }
        HabitAction::List { all } => {
            let habits = store.list_habits(all)?;
            print_json(&habits)?;
        }
        HabitAction::Archive { id } => {
            store.set_archived(&id, true)?;
            println!("archived: {id}");
        }
        HabitAction::Unarchive { id } => {
            store.set_archived(&id, false)?;
            println!("unarchived: {id}");
        }
        HabitAction::Delete { id } => {
            store.delete_habit(&id)?;
            println!("deleted: {id}");
        }
        HabitAction::Done { id, date } => {
            let date = today_or(date);
            let entry = store.set_completed(&id, date, true)?;
            print_json(&LogResult { habit_id: &id, date, entry })?;
        }
        HabitAction::Undo { id, date } => {
            let date = today_or(date);
            let entry = store.set_completed(&id, date, false)?;
            print_json(&LogResult { habit_id: &id, date, entry })?;
        }
        HabitAction::Toggle { id, date } => {
            let date = today_or(date);
            let entry = store.toggle(&id, date)?;
            print_json(&LogResult { habit_id: &id, date, entry })?;
        }
        HabitAction::Note { id, text, date } => {
            let date = today_or(date);
            let entry = store.set_note(&id, date, text.as_deref())?;
            print_json(&LogResult { habit_id: &id, date, entry })?;
        }
    }
    Ok(())
}
