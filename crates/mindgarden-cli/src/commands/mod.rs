pub mod config;
pub mod habit;
pub mod stats;

use chrono::{NaiveDate, Utc};
use mindgarden_core::utc_day;

/// The reference day: `--today`/`--date` if given, else the current UTC day.
pub fn today_or(day: Option<NaiveDate>) -> NaiveDate {
    day.unwrap_or_else(|| utc_day(Utc::now()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
