//! TOML-based application configuration.
//!
//! Stores:
//! - Engine settings (streak cap, best-habit rule)
//! - Dashboard history window
//! - Default log level
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::habit::{EngineConfig, DEFAULT_STREAK_CAP};

/// Largest accepted streak cap (about ten years).
const MAX_STREAK_CAP: u32 = 3650;

/// Engine section, mirrored into [`EngineConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_streak_cap")]
    pub streak_cap: u32,
    #[serde(default = "default_true")]
    pub best_requires_streak: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How many days of entries the dashboard loads per habit.
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `MINDGARDEN_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_streak_cap() -> u32 {
    DEFAULT_STREAK_CAP
}
fn default_true() -> bool {
    true
}
fn default_history_days() -> u32 {
    60
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            streak_cap: default_streak_cap(),
            best_requires_streak: true,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            history_days: default_history_days(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Object(_) => return Err(invalid("not a leaf key".into())),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if no file exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_STREAK_CAP).contains(&self.engine.streak_cap) {
            return Err(ConfigError::InvalidValue {
                key: "engine.streak_cap".into(),
                message: format!("must be between 1 and {MAX_STREAK_CAP}"),
            });
        }
        if self.dashboard.history_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "dashboard.history_days".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key, validating the result.
    /// On error `self` is left unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Update a value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            streak_cap: self.engine.streak_cap,
            best_requires_streak: self.engine.best_requires_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.engine.streak_cap, 365);
        assert!(parsed.engine.best_requires_streak);
        assert_eq!(parsed.dashboard.history_days, 60);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[engine]\nstreak_cap = 90\n").unwrap();
        assert_eq!(parsed.engine.streak_cap, 90);
        assert!(parsed.engine.best_requires_streak);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("engine.streak_cap").as_deref(), Some("365"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("warn"));
        assert!(cfg.get("engine.nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_parses_by_existing_type() {
        let mut cfg = Config::default();
        cfg.apply("engine.streak_cap", "30").unwrap();
        cfg.apply("engine.best_requires_streak", "false").unwrap();
        cfg.apply("logging.level", "debug").unwrap();

        let engine = cfg.engine_config();
        assert_eq!(engine.streak_cap, 30);
        assert!(!engine.best_requires_streak);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn apply_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("engine.missing", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("engine", "1"), Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(
            cfg.apply("engine.streak_cap", "many"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.apply("engine.streak_cap", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.engine.streak_cap, 365);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.engine.streak_cap, 365);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.apply("dashboard.history_days", "365").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dashboard.history_days, 365);
    }

    #[test]
    fn load_from_rejects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\nstreak_cap = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
