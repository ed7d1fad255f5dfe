//! Habit streak and completion-rate engine.
//!
//! Every caller that needs a streak, a completion percentage, or a "best
//! habit" goes through [`HabitProgressEngine`]. The engine is pure: it reads
//! a [`HabitLog`] snapshot and a reference day supplied by the caller and
//! never consults a clock.
//!
//! ## Truncation
//!
//! Callers usually fetch a bounded window of entries (for example the last
//! 60 days). A streak computed over such a snapshot is a lower bound that
//! stops at the window edge.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::log::HabitLog;
use super::window::DateWindow;
use crate::error::ValidationError;

/// Default upper bound on how far back a streak walk looks.
pub const DEFAULT_STREAK_CAP: u32 = 365;

/// Completed days over total days in a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRate {
    pub completed: u32,
    pub total: u32,
    /// `completed / total * 100`, rounded half away from zero. 0 when `total` is 0.
    pub percentage: u32,
}

impl CompletionRate {
    pub fn new(completed: u32, total: u32) -> Self {
        Self {
            completed,
            total,
            percentage: rounded_percentage(completed, total),
        }
    }
}

fn rounded_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(c * 100 / t) == floor((200c + t) / 2t) for non-negative c, t
    let (c, t) = (u64::from(completed), u64::from(total));
    ((200 * c + t) / (2 * t)) as u32
}

/// A habit paired with its current streak, as fed to ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStreak {
    pub habit_id: String,
    pub streak: u32,
}

impl HabitStreak {
    pub fn new(habit_id: impl Into<String>, streak: u32) -> Self {
        Self {
            habit_id: habit_id.into(),
            streak,
        }
    }
}

/// Habits sorted by streak, longest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRanking {
    pub ranked: Vec<HabitStreak>,
    pub best: Option<HabitStreak>,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of days a streak walk inspects, today included.
    pub streak_cap: u32,
    /// Report no `best` habit when the longest streak is zero.
    pub best_requires_streak: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            streak_cap: DEFAULT_STREAK_CAP,
            best_requires_streak: true,
        }
    }
}

/// Pure streak/rate computation over habit logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HabitProgressEngine {
    config: EngineConfig,
}

impl HabitProgressEngine {
    /// Create an engine with the default streak cap.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True iff `log` holds a completed entry for `date`.
    pub fn is_completed_on(&self, log: &HabitLog, date: NaiveDate) -> bool {
        log.is_completed_on(date)
    }

    /// Consecutive completed days walking back from `reference`.
    ///
    /// An incomplete `reference` day is skipped rather than breaking the
    /// streak, so a habit done every day through yesterday keeps its count
    /// until today is over. Any other gap ends the walk. At most
    /// `streak_cap` days are inspected.
    pub fn current_streak(&self, log: &HabitLog, reference: NaiveDate) -> u32 {
        let Some(earliest) = log.earliest() else {
            return 0;
        };

        let mut streak = 0;
        for i in 0..self.config.streak_cap {
            let Some(day) = reference.checked_sub_days(Days::new(u64::from(i))) else {
                break;
            };
            if day < earliest {
                break;
            }
            if log.is_completed_on(day) {
                streak += 1;
            } else if i > 0 {
                break;
            }
        }
        streak
    }

    /// Completion counts over the inclusive range `[start, end]`.
    ///
    /// # Errors
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn completion_rate(
        &self,
        log: &HabitLog,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CompletionRate, ValidationError> {
        let window = DateWindow::new(start, end)?;
        Ok(self.completion_rate_in(log, window))
    }

    /// Completion counts over an already-validated window.
    pub fn completion_rate_in(&self, log: &HabitLog, window: DateWindow) -> CompletionRate {
        let total = window.days();
        let completed = if log.len() < total as usize {
            log.iter()
                .filter(|e| e.completed && window.contains(e.date))
                .count() as u32
        } else {
            window.iter().filter(|d| log.is_completed_on(*d)).count() as u32
        };
        CompletionRate::new(completed, total)
    }

    /// Longest run of consecutive completed days inside `window`.
    pub fn longest_streak(&self, log: &HabitLog, window: DateWindow) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        for day in window.iter() {
            if log.is_completed_on(day) {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        longest
    }

    /// Sort habits by streak, longest first, keeping input order for ties.
    pub fn rank_by_streak(&self, habits: &[HabitStreak]) -> StreakRanking {
        let mut ranked = habits.to_vec();
        ranked.sort_by(|a, b| b.streak.cmp(&a.streak));

        let best = ranked
            .first()
            .filter(|top| top.streak > 0 || !self.config.best_requires_streak)
            .cloned();

        StreakRanking { ranked, best }
    }
}
