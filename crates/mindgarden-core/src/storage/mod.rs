mod config;
pub mod database;

pub use config::{Config, DashboardConfig, EngineSection, LoggingConfig};
pub use database::HabitStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `MINDGARDEN_HOME` overrides the location entirely. Otherwise this is
/// `~/.config/mindgarden`, or `~/.config/mindgarden-dev` when
/// `MINDGARDEN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MINDGARDEN_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MINDGARDEN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("mindgarden-dev")
            } else {
                base_dir.join("mindgarden")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
