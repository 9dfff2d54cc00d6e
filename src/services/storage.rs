//! JSON snapshot of the schedule and theme preference.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ClassSession;

use super::ThemeMode;

/// On-disk layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredSchedule {
    #[serde(default)]
    pub classes: Vec<ClassSession>,
    #[serde(default)]
    pub theme: ThemeMode,
}

/// Reads and writes the schedule file.
#[derive(Debug, Clone)]
pub struct ScheduleStorage {
    path: PathBuf,
}

impl ScheduleStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing file is an empty schedule.
    pub fn load(&self) -> Result<StoredSchedule> {
        if !self.path.exists() {
            return Ok(StoredSchedule::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let stored = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(stored)
    }

    /// Write the snapshot, creating parent directories as needed.
    pub fn save(&self, stored: &StoredSchedule) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(stored)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, Weekday};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ScheduleStorage::new(dir.path().join("nope.json"));
        let stored = storage.load().unwrap();
        assert!(stored.classes.is_empty());
        assert_eq!(stored.theme, ThemeMode::Light);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ScheduleStorage::new(dir.path().join("nested").join("schedule.json"));
        let session = ClassSession::new(
            "Compilers",
            Weekday::Thursday,
            ClockTime::from_hm(13, 0).unwrap(),
            ClockTime::from_hm(14, 30).unwrap(),
            "B204",
            "#10B981",
        )
        .with_description("Lab week");

        let stored = StoredSchedule {
            classes: vec![session.clone()],
            theme: ThemeMode::Dark,
        };
        storage.save(&stored).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.classes, vec![session]);
        assert_eq!(loaded.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        fs::write(&path, "{not json").unwrap();
        assert!(ScheduleStorage::new(path).load().is_err());
    }
}
