//! Server configuration.
//!
//! Loaded from a TOML file; every field has a default, so an empty or
//! missing file yields a working local setup. `PETCARE_DB` and
//! `PETCARE_BIND` override the file.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use petcare_core::{BookingPolicy, WorkWindow};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `server.database`.
pub const DB_ENV: &str = "PETCARE_DB";
/// Environment variable overriding `server.bind`.
pub const BIND_ENV: &str = "PETCARE_BIND";

const TIME_FORMAT: &str = "%H:%M";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// SQLite database file
    pub database: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            database: PathBuf::from("petcare.db"),
            log_filter: "info".to_string(),
        }
    }
}

/// Working hours and durations, times as `HH:MM` (UTC).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub work_start: String,
    pub work_end: String,
    pub slot_minutes: u32,
    pub request_minutes: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            work_start: "09:00".to_string(),
            work_end: "18:00".to_string(),
            slot_minutes: 30,
            request_minutes: 30,
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `path` (defaults when `None`), then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.booking_policy()?;
        Ok(config)
    }

    /// Apply `PETCARE_DB` / `PETCARE_BIND` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DB_ENV).filter(|v| !v.is_empty()) {
            self.server.database = PathBuf::from(db);
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
    }

    /// Validated scheduling policy.
    pub fn booking_policy(&self) -> Result<BookingPolicy, ConfigError> {
        let schedule = &self.schedule;
        let start = parse_time("work_start", &schedule.work_start)?;
        let end = parse_time("work_end", &schedule.work_end)?;

        if schedule.request_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "request_minutes must be positive".into(),
            ));
        }
        let window = WorkWindow::new(start, end, schedule.slot_minutes)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(BookingPolicy {
            window,
            request_minutes: schedule.request_minutes,
        })
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| ConfigError::Invalid(format!("{} must be HH:MM, got {:?}", field, value)))
}
