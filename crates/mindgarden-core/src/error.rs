//! Core error types for mindgarden-core.
//!
//! The engine itself only ever raises [`ValidationError`]; storage and
//! configuration add their own variants, and [`CoreError`] ties them together
//! for callers that touch more than one layer.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for mindgarden-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid arguments passed by a caller
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No habit with the given id
    #[error("Habit not found: {id}")]
    HabitNotFound { id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a configuration field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Invalid-argument errors raised synchronously to the immediate caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Window start falls after window end
    #[error("Invalid date range: start ({start}) must not be after end ({end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Two log entries for the same habit on the same day
    #[error("Duplicate log entry for {date}")]
    DuplicateEntry { date: NaiveDate },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if code.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_message_names_both_dates() {
        let err = ValidationError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-03-02"));
        assert!(msg.contains("2024-03-01"));
    }

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = ValidationError::DuplicateEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().starts_with("Validation error"));
    }

    #[test]
    fn locked_sqlite_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(DatabaseError::from(err), DatabaseError::Locked));
    }
}
