//! Month grid for the habit calendar widget.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::engine::{CompletionRate, HabitProgressEngine};
use super::log::HabitLog;
use super::window::DateWindow;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub completed: bool,
    pub has_note: bool,
    /// After the reference day; the widget renders these as not yet loggable.
    pub is_future: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st in a Monday-first grid.
    pub first_weekday_offset: u32,
    pub days: Vec<CalendarDay>,
    /// Rate over the month up to the reference day.
    pub rate: CompletionRate,
}

impl HabitProgressEngine {
    /// Lay out one month of `log` as seen on `reference`.
    ///
    /// # Errors
    /// Returns `InvalidValue` if `year`/`month` do not name a calendar month.
    pub fn calendar_month(
        &self,
        log: &HabitLog,
        year: i32,
        month: u32,
        reference: NaiveDate,
    ) -> Result<CalendarMonth, ValidationError> {
        let window = DateWindow::month(year, month)?;

        let days = window
            .iter()
            .map(|date| CalendarDay {
                date,
                completed: log.is_completed_on(date),
                has_note: log.get(date).is_some_and(|e| e.has_note()),
                is_future: date > reference,
            })
            .collect();

        let rate = window
            .clamp_end(reference)
            .map_or_else(CompletionRate::default, |elapsed| {
                self.completion_rate_in(log, elapsed)
            });

        Ok(CalendarMonth {
            year,
            month,
            first_weekday_offset: window.start().weekday().num_days_from_monday(),
            days,
            rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::log::HabitLogEntry;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lays_out_leap_february() {
        let log = HabitLog::from_entries(vec![
            HabitLogEntry::completed(day(2024, 2, 1)),
            HabitLogEntry::missed(day(2024, 2, 2)).with_note("rest day"),
        ])
        .unwrap();

        let cal = HabitProgressEngine::new()
            .calendar_month(&log, 2024, 2, day(2024, 2, 10))
            .unwrap();

        assert_eq!(cal.days.len(), 29);
        // 2024-02-01 was a Thursday
        assert_eq!(cal.first_weekday_offset, 3);
        assert!(cal.days[0].completed);
        assert!(cal.days[1].has_note);
        assert!(!cal.days[1].completed);
        assert!(!cal.days[9].is_future);
        assert!(cal.days[10].is_future);
        assert_eq!(cal.rate, CompletionRate::new(1, 10));
    }

    #[test]
    fn future_month_has_empty_rate() {
        let cal = HabitProgressEngine::new()
            .calendar_month(&HabitLog::new(), 2024, 5, day(2024, 4, 30))
            .unwrap();
        assert!(cal.days.iter().all(|d| d.is_future));
        assert_eq!(cal.rate, CompletionRate { completed: 0, total: 0, percentage: 0 });
    }

    #[test]
    fn past_month_rate_covers_whole_month() {
        let log = HabitLog::from_completed_days([day(2024, 1, 31)]).unwrap();
        let cal = HabitProgressEngine::new()
            .calendar_month(&log, 2024, 1, day(2024, 3, 1))
            .unwrap();
        assert_eq!(cal.rate.total, 31);
        assert_eq!(cal.rate.completed, 1);
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(HabitProgressEngine::new()
            .calendar_month(&HabitLog::new(), 2024, 0, day(2024, 1, 1))
            .is_err());
    }
}
