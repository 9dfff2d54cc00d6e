//! Configuration management.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::ClockTime;
use crate::services::{ScheduleIndex, DAY_CLOSE, DAY_OPEN};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Schedule storage and free-slot search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Path to the schedule JSON file
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Start of the daily free-slot window
    #[serde(default = "default_day_open")]
    pub day_open: ClockTime,
    /// End of the daily free-slot window
    #[serde(default = "default_day_close")]
    pub day_close: ClockTime,
    /// Minimum free-slot length preselected in the finder, in minutes
    #[serde(default = "default_min_duration")]
    pub default_min_duration: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            day_open: default_day_open(),
            day_close: default_day_close(),
            default_min_duration: default_min_duration(),
        }
    }
}

fn default_data_file() -> String {
    Config::data_dir()
        .join("schedule.json")
        .to_string_lossy()
        .to_string()
}

fn default_day_open() -> ClockTime {
    DAY_OPEN
}

fn default_day_close() -> ClockTime {
    DAY_CLOSE
}

fn default_min_duration() -> u32 {
    60
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Step used when adjusting times in the class form
    #[serde(default = "default_time_step")]
    pub time_step_minutes: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_step_minutes: default_time_step(),
        }
    }
}

fn default_time_step() -> u16 {
    30
}

impl Config {
    /// Load configuration from default location.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::from_file(&config_path.to_string_lossy())
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = std::fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config {}", expanded))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", expanded))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.schedule.day_open >= self.schedule.day_close {
            bail!(
                "day_open ({}) must be before day_close ({})",
                self.schedule.day_open,
                self.schedule.day_close
            );
        }
        if self.display.time_step_minutes == 0 {
            bail!("time_step_minutes must be positive");
        }
        Ok(())
    }

    /// Get the default config path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("class-scheduler")
            .join("config.toml")
    }

    /// Get the data directory for the schedule, exports and logs.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("class-scheduler")
    }

    /// Resolved schedule file path.
    pub fn data_file(&self) -> PathBuf {
        PathBuf::from(expand_path(&self.schedule.data_file))
    }

    /// Empty schedule index using the configured window.
    pub fn new_index(&self) -> ScheduleIndex {
        ScheduleIndex::with_window(self.schedule.day_open, self.schedule.day_close)
    }
}

/// Expand ~ to home directory.
fn expand_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.schedule.day_open, DAY_OPEN);
        assert_eq!(config.schedule.day_close, DAY_CLOSE);
        assert_eq!(config.schedule.default_min_duration, 60);
        assert_eq!(config.display.time_step_minutes, 30);
    }

    #[test]
    fn test_from_file_overrides_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[schedule]\ndata_file = \"/tmp/s.json\"\nday_open = \"08:00\"\nday_close = \"18:30\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path.to_string_lossy()).unwrap();
        assert_eq!(config.data_file(), PathBuf::from("/tmp/s.json"));
        assert_eq!(config.new_index().window().1.to_string(), "18:30");
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nday_open = \"20:00\"\nday_close = \"09:00\"\n").unwrap();
        assert!(Config::from_file(&path.to_string_lossy()).is_err());
    }

    #[test]
    fn test_expand_path_leaves_absolute_alone() {
        assert_eq!(expand_path("/etc/x"), "/etc/x");
    }
}
