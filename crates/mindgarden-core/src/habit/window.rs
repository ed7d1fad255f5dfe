//! Inclusive calendar-day windows.
//!
//! All days are UTC calendar days. [`utc_day`] is the single place where a
//! timestamp becomes a day; everything downstream works on `NaiveDate`.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of days in the trailing "this week" window.
pub const WEEK_DAYS: u32 = 7;

/// Normalize a timestamp to its UTC calendar day.
pub fn utc_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// An inclusive, non-empty range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked wire form; deserialization goes through [`DateWindow::new`].
#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = ValidationError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Create a window `[start, end]`.
    ///
    /// # Errors
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// The `days` days ending on `reference`, inclusive.
    ///
    /// # Errors
    /// Returns `InvalidValue` if `days` is zero or reaches before the
    /// earliest representable date.
    pub fn trailing(reference: NaiveDate, days: u32) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::InvalidValue {
                field: "days".into(),
                message: "window must span at least one day".into(),
            });
        }
        let start = reference
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "days".into(),
                message: format!("{days} days before {reference} is out of range"),
            })?;
        Ok(Self { start, end: reference })
    }

    /// Seven days ending on `reference`.
    pub fn trailing_week(reference: NaiveDate) -> Result<Self, ValidationError> {
        Self::trailing(reference, WEEK_DAYS)
    }

    /// First of `reference`'s month through `reference`.
    pub fn month_to_date(reference: NaiveDate) -> Self {
        let start = reference.with_day(1).unwrap_or(reference);
        Self { start, end: reference }
    }

    /// Snapshot a summary needs as of `reference`: at least `history_days`,
    /// and never less than the trailing week or the month so far, so summary
    /// rates match the standalone week and month figures.
    pub fn summary_history(reference: NaiveDate, history_days: u32) -> Result<Self, ValidationError> {
        let month_days = Self::month_to_date(reference).days();
        Self::trailing(reference, history_days.max(month_days).max(WEEK_DAYS))
    }

    /// The whole calendar month.
    ///
    /// # Errors
    /// Returns `InvalidValue` for a month outside 1..=12 or an
    /// unrepresentable year.
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month:02} is not a calendar month"),
            }
        })?;
        let end = last_day_of_month(start).ok_or_else(|| ValidationError::InvalidValue {
            field: "month".into(),
            message: format!("{year}-{month:02} is out of range"),
        })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count.
    pub fn days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Clamp the end of the window to `limit`. Returns `None` when the
    /// whole window lies after `limit`.
    pub fn clamp_end(&self, limit: NaiveDate) -> Option<Self> {
        if limit < self.start {
            return None;
        }
        Some(Self {
            start: self.start,
            end: self.end.min(limit),
        })
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Last day of the month containing `day`.
pub fn last_day_of_month(day: NaiveDate) -> Option<NaiveDate> {
    let first = day.with_day(1)?;
    first
        .checked_add_months(chrono::Months::new(1))?
        .pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_rejects_reversed_range() {
        let err = DateWindow::new(day(2024, 1, 2), day(2024, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDateRange {
                start: day(2024, 1, 2),
                end: day(2024, 1, 1),
            }
        );
    }

    #[test]
    fn deserialize_rejects_reversed_range() {
        let err = serde_json::from_str::<DateWindow>(r#"{"start":"2024-01-02","end":"2024-01-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid date range"));

        let w: DateWindow =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-07"}"#).unwrap();
        assert_eq!(w.days(), 7);
        assert_eq!(serde_json::to_value(w).unwrap()["end"], "2024-01-07");
    }

    #[test]
    fn single_day_window_spans_one_day() {
        let w = DateWindow::single(day(2024, 5, 5));
        assert_eq!(w.days(), 1);
        assert_eq!(w.iter().count(), 1);
    }

    #[test]
    fn trailing_week_ends_on_reference() {
        let w = DateWindow::trailing_week(day(2024, 3, 3)).unwrap();
        assert_eq!(w.start(), day(2024, 2, 26));
        assert_eq!(w.end(), day(2024, 3, 3));
        assert_eq!(w.days(), 7);
    }

    #[test]
    fn trailing_zero_days_is_invalid() {
        assert!(matches!(
            DateWindow::trailing(day(2024, 3, 3), 0),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn month_to_date_starts_on_first() {
        let w = DateWindow::month_to_date(day(2024, 2, 10));
        assert_eq!(w.start(), day(2024, 2, 1));
        assert_eq!(w.days(), 10);
    }

    #[test]
    fn summary_history_covers_week_and_month() {
        let reference = day(2024, 4, 20);
        assert_eq!(DateWindow::summary_history(reference, 3).unwrap().start(), day(2024, 4, 1));
        assert_eq!(DateWindow::summary_history(day(2024, 4, 2), 3).unwrap().days(), 7);
        assert_eq!(DateWindow::summary_history(reference, 60).unwrap().days(), 60);
    }

    #[test]
    fn month_handles_leap_february() {
        assert_eq!(DateWindow::month(2024, 2).unwrap().days(), 29);
        assert_eq!(DateWindow::month(2023, 2).unwrap().days(), 28);
        assert_eq!(DateWindow::month(2024, 12).unwrap().end(), day(2024, 12, 31));
        assert!(DateWindow::month(2024, 13).is_err());
    }

    #[test]
    fn clamp_end_to_reference() {
        let feb = DateWindow::month(2024, 2).unwrap();
        assert_eq!(feb.clamp_end(day(2024, 2, 14)).unwrap().days(), 14);
        assert_eq!(feb.clamp_end(day(2024, 3, 14)).unwrap(), feb);
        assert!(feb.clamp_end(day(2024, 1, 31)).is_none());
    }

    #[test]
    fn utc_day_ignores_time_of_day() {
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(utc_day(late), utc_day(early));
        assert_eq!(utc_day(late), day(2024, 1, 1));
    }
}
