//! Habit tracking: log model, date windows, and the progress engine.
//!
//! All day arithmetic uses UTC calendar days. Timestamps are converted with
//! [`utc_day`] at the boundary; nothing below this module sees a time of day.

mod calendar;
mod engine;
mod log;
mod summary;
mod window;

pub use calendar::{CalendarDay, CalendarMonth};
pub use engine::{
    CompletionRate, EngineConfig, HabitProgressEngine, HabitStreak, StreakRanking,
    DEFAULT_STREAK_CAP,
};
pub use log::{Habit, HabitLog, HabitLogEntry};
pub use summary::{Dashboard, HabitSummary};
pub use window::{last_day_of_month, utc_day, DateWindow, WEEK_DAYS};
