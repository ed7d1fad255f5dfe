//! Streak, completion-rate and dashboard commands.
//!
//! Every figure is computed by the core engine; this module only picks the
//! snapshot window and the reference day.

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use mindgarden_core::{
    CompletionRate, Config, DateWindow, HabitProgressEngine, HabitStore, HabitSummary,
};
use serde::Serialize;

use super::{print_json, today_or};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current streak of one habit
    Streak {
        /// Habit ID
        id: String,
        /// Reference day (YYYY-MM-DD, default: today in UTC)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Completion rate over an inclusive date range
    Rate {
        /// Habit ID
        id: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Completion rate over the trailing seven days
    Week {
        /// Habit ID
        id: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Completion rate for the month so far
    Month {
        /// Habit ID
        id: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Month grid for one habit
    Calendar {
        /// Habit ID
        id: String,
        /// Year (default: year of the reference day)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: month of the reference day)
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Summaries and streak ranking of all active habits
    Dashboard {
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Summaries of all habits over their full history
    Export {
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct StreakOutput<'a> {
    habit_id: &'a str,
    reference: NaiveDate,
    streak: u32,
    completed_today: bool,
}

#[derive(Serialize)]
struct RateOutput<'a> {
    habit_id: &'a str,
    window: DateWindow,
    #[serde(flatten)]
    rate: CompletionRate,
}

#[derive(Serialize)]
struct ExportOutput {
    reference: NaiveDate,
    habits: Vec<HabitSummary>,
}

pub fn run(action: StatsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = HabitStore::open()?;
    let engine = HabitProgressEngine::with_config(config.engine_config());

    match action {
        StatsAction::Streak { id, today } => {
            let reference = today_or(today);
            let window = DateWindow::trailing(reference, engine.config().streak_cap)?;
            let log = store.log(&id, Some(window))?;
            print_json(&StreakOutput {
                habit_id: &id,
                reference,
                streak: engine.current_streak(&log, reference),
                completed_today: engine.is_completed_on(&log, reference),
            })?;
        }
        StatsAction::Rate { id, from, to } => {
            let window = DateWindow::new(from, to)?;
            let log = store.log(&id, Some(window))?;
            let rate = engine.completion_rate(&log, from, to)?;
            print_json(&RateOutput { habit_id: &id, window, rate })?;
        }
        StatsAction::Week { id, today } => {
            let window = DateWindow::trailing_week(today_or(today))?;
            let log = store.log(&id, Some(window))?;
            let rate = engine.completion_rate_in(&log, window);
            print_json(&RateOutput { habit_id: &id, window, rate })?;
        }
        StatsAction::Month { id, today } => {
            let window = DateWindow::month_to_date(today_or(today));
            let log = store.log(&id, Some(window))?;
            let rate = engine.completion_rate_in(&log, window);
            print_json(&RateOutput { habit_id: &id, window, rate })?;
        }
        StatsAction::Calendar { id, year, month, today } => {
            let reference = today_or(today);
            let year = year.unwrap_or_else(|| reference.year());
            let month = month.unwrap_or_else(|| reference.month());
            let window = DateWindow::month(year, month)?;
            let log = store.log(&id, Some(window))?;
            print_json(&engine.calendar_month(&log, year, month, reference)?)?;
        }
        StatsAction::Dashboard { today } => {
            let reference = today_or(today);
            let history = DateWindow::summary_history(reference, config.dashboard.history_days)?;
            let habits = store.list_habits(false)?;
            let logs = habits
                .iter()
                .map(|h| store.log(&h.id, Some(history)))
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&engine.dashboard(habits.iter().zip(logs.iter()), reference))?;
        }
        StatsAction::Export { today } => {
            let reference = today_or(today);
            let mut summaries = Vec::new();
            for habit in store.list_habits(true)? {
                let log = store.log(&habit.id, None)?;
                summaries.push(engine.summarize(&habit, &log, reference));
            }
            tracing::info!(habits = summaries.len(), %reference, "exported habit summaries");
            print_json(&ExportOutput { reference, habits: summaries })?;
        }
    }
    Ok(())
}
