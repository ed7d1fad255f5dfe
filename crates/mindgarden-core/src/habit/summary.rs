//! Per-habit progress summaries shared by the dashboard, the habit page and
//! export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::{CompletionRate, HabitProgressEngine, HabitStreak, StreakRanking};
use super::log::{Habit, HabitLog};
use super::window::DateWindow;

/// Everything a habit card shows, computed once per habit per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub streak: u32,
    /// Longest run between the first entry in the snapshot and the reference day.
    pub longest_streak: u32,
    pub completed_today: bool,
    /// Trailing seven days ending on the reference day.
    pub week: CompletionRate,
    /// First of the month through the reference day.
    pub month: CompletionRate,
}

/// Summaries for all active habits plus their streak ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub reference: Option<NaiveDate>,
    pub habits: Vec<HabitSummary>,
    pub ranking: StreakRanking,
}

impl HabitProgressEngine {
    /// Summarize one habit as of `reference`.
    pub fn summarize(&self, habit: &Habit, log: &HabitLog, reference: NaiveDate) -> HabitSummary {
        let longest_streak = log
            .earliest()
            .and_then(|first| DateWindow::new(first, reference).ok())
            .map_or(0, |history| self.longest_streak(log, history));

        // A reference within six days of NaiveDate::MIN has no full week;
        // fall back to the month-to-date window in that case.
        let month_window = DateWindow::month_to_date(reference);
        let week_window = DateWindow::trailing_week(reference).unwrap_or(month_window);

        HabitSummary {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            streak: self.current_streak(log, reference),
            longest_streak,
            completed_today: self.is_completed_on(log, reference),
            week: self.completion_rate_in(log, week_window),
            month: self.completion_rate_in(log, month_window),
        }
    }

    /// Summarize and rank every non-archived habit, in input order.
    pub fn dashboard<'a, I>(&self, habits: I, reference: NaiveDate) -> Dashboard
    where
        I: IntoIterator<Item = (&'a Habit, &'a HabitLog)>,
    {
        let summaries: Vec<HabitSummary> = habits
            .into_iter()
            .filter(|(habit, _)| !habit.archived)
            .map(|(habit, log)| self.summarize(habit, log, reference))
            .collect();

        let streaks: Vec<HabitStreak> = summaries
            .iter()
            .map(|s| HabitStreak::new(s.habit_id.clone(), s.streak))
            .collect();
        let ranking = self.rank_by_streak(&streaks);

        tracing::debug!(
            habits = summaries.len(),
            best = ranking.best.as_ref().map(|b| b.habit_id.as_str()),
            "built habit dashboard"
        );

        Dashboard {
            reference: Some(reference),
            habits: summaries,
            ranking,
        }
    }
}
