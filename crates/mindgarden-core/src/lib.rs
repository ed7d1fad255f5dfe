//! # Mind Garden Core Library
//!
//! Habit progress computation for Mind Garden. Streaks, completion rates and
//! the "best habit" ranking are defined once here so the dashboard, habit
//! page, calendar widget and export all agree.
//!
//! ## Architecture
//!
//! - **Habit engine**: pure functions over a habit's log snapshot and a
//!   caller-supplied reference day. No clock, no I/O.
//! - **Storage**: SQLite habit store that feeds the engine windowed
//!   snapshots, and TOML-based configuration.
//!
//! ## Key Components
//!
//! - [`HabitProgressEngine`]: streak, rate, ranking, summaries, calendar
//! - [`HabitLog`]: one habit's entries keyed by UTC day
//! - [`HabitStore`]: habit and log persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod habit;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use habit::{
    utc_day, CalendarDay, CalendarMonth, CompletionRate, Dashboard, DateWindow, EngineConfig,
    Habit, HabitLog, HabitLogEntry, HabitProgressEngine, HabitStreak, HabitSummary,
    StreakRanking,
};
pub use storage::{Config, HabitStore};
