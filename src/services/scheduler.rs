//! Scheduler - the schedule index plus persistence and theme state.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::models::{ClassSession, ConflictInfo, FreeSlot, Weekday};

use super::{ScheduleIndex, ScheduleStorage, StoredSchedule, ThemeMode};

/// Owns the single schedule index; saves after every change that sticks.
pub struct Scheduler {
    index: ScheduleIndex,
    storage: Option<ScheduleStorage>,
    theme_mode: ThemeMode,
}

impl Scheduler {
    /// In-memory scheduler that never touches disk.
    pub fn new(index: ScheduleIndex) -> Self {
        Self {
            index,
            storage: None,
            theme_mode: ThemeMode::default(),
        }
    }

    /// Load saved classes into `index`.
    ///
    /// An unreadable file starts an empty schedule. Saved classes that
    /// overlap an earlier one are skipped.
    pub fn open(mut index: ScheduleIndex, storage: ScheduleStorage) -> Self {
        let stored = match storage.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Starting with an empty schedule: {:#}", e);
                StoredSchedule::default()
            }
        };

        let total = stored.classes.len();
        for class in stored.classes {
            let conflict = index.add_session(class.clone());
            if conflict.has_conflict {
                warn!(
                    id = %class.id,
                    "Skipping saved class {}: {}",
                    class.course_name,
                    conflict.message.unwrap_or_default()
                );
            }
        }
        info!(
            loaded = index.len(),
            total,
            path = %storage.path().display(),
            "Loaded schedule"
        );

        Self {
            index,
            storage: Some(storage),
            theme_mode: stored.theme,
        }
    }

    pub fn index(&self) -> &ScheduleIndex {
        &self.index
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    /// Add a class; saved only when it was accepted.
    pub fn add_class(&mut self, class: ClassSession) -> Result<ConflictInfo> {
        let conflict = self.index.add_session(class);
        if !conflict.has_conflict {
            self.save()?;
        }
        Ok(conflict)
    }

    pub fn remove_class(&mut self, day: Weekday, id: &str) -> Result<bool> {
        let removed = self.index.remove_session(day, id);
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Replace a class by id, keeping the old version on conflict.
    pub fn update_class(&mut self, class: ClassSession) -> Result<ConflictInfo> {
        let conflict = self.index.update_session(class);
        if !conflict.has_conflict {
            self.save()?;
        }
        Ok(conflict)
    }

    pub fn classes_for_day(&self, day: Weekday) -> Vec<ClassSession> {
        self.index.sessions_for_day(day)
    }

    /// Every class ordered by weekday, then start time.
    pub fn all_classes(&self) -> Vec<ClassSession> {
        let mut classes = self.index.all_sessions();
        classes.sort_by_key(|c| (c.day, c.start_time));
        classes
    }

    pub fn detect_conflict(&self, class: &ClassSession) -> ConflictInfo {
        self.index.detect_conflict(class)
    }

    pub fn suggest_free_slots(&self, min_duration: u32, days: Option<&[Weekday]>) -> Vec<FreeSlot> {
        self.index.suggest_free_slots(min_duration, days)
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        self.theme_mode = self.theme_mode.toggled();
        self.save()?;
        Ok(self.theme_mode)
    }

    /// Remove every class.
    pub fn clear_all(&mut self) -> Result<()> {
        self.index.reset();
        info!("Cleared all classes");
        self.save()
    }

    fn save(&self) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let stored = StoredSchedule {
            classes: self.all_classes(),
            theme: self.theme_mode,
        };
        storage.save(&stored)?;
        debug!(classes = stored.classes.len(), "Saved schedule");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockTime;

    fn at(h: u16, m: u16) -> ClockTime {
        ClockTime::from_hm(h, m).unwrap()
    }

    fn class(id: &str, day: Weekday, start: ClockTime, end: ClockTime) -> ClassSession {
        ClassSession::new(id, day, start, end, "Room", "#3B82F6").with_id(id)
    }

    fn storage_in(dir: &tempfile::TempDir) -> ScheduleStorage {
        ScheduleStorage::new(dir.path().join("schedule.json"))
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = Scheduler::open(ScheduleIndex::new(), storage_in(&dir));
        scheduler
            .add_class(class("1", Weekday::Monday, at(9, 0), at(10, 0)).with_description("Intro"))
            .unwrap();
        scheduler.add_class(class("2", Weekday::Friday, at(9, 0), at(10, 0))).unwrap();
        scheduler.remove_class(Weekday::Friday, "2").unwrap();
        scheduler.toggle_theme().unwrap();

        let reopened = Scheduler::open(ScheduleIndex::new(), storage_in(&dir));
        let classes = reopened.all_classes();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].description.as_deref(), Some("Intro"));
        assert_eq!(reopened.theme_mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_overlapping_saved_classes_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        storage
            .save(&StoredSchedule {
                classes: vec![
                    class("1", Weekday::Monday, at(9, 0), at(10, 0)),
                    class("2", Weekday::Monday, at(9, 30), at(11, 0)),
                    class("3", Weekday::Monday, at(11, 0), at(12, 0)),
                ],
                theme: ThemeMode::Light,
            })
            .unwrap();

        let scheduler = Scheduler::open(ScheduleIndex::new(), storage);
        let ids: Vec<String> = scheduler.all_classes().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schedule.json"), "[[[").unwrap();
        let scheduler = Scheduler::open(ScheduleIndex::new(), storage_in(&dir));
        assert!(scheduler.index().is_empty());
    }

    #[test]
    fn test_failed_update_keeps_original() {
        let mut scheduler = Scheduler::new(ScheduleIndex::new());
        let original = class("1", Weekday::Monday, at(9, 0), at(10, 0));
        scheduler.add_class(original.clone()).unwrap();
        scheduler.add_class(class("2", Weekday::Monday, at(10, 0), at(11, 0))).unwrap();

        let conflict = scheduler
            .update_class(class("1", Weekday::Monday, at(9, 30), at(10, 30)))
            .unwrap();
        assert!(conflict.has_conflict);
        assert!(scheduler.all_classes().contains(&original));
    }

    #[test]
    fn test_all_classes_sorted_by_day_then_time() {
        let mut scheduler = Scheduler::new(ScheduleIndex::new());
        scheduler.add_class(class("c", Weekday::Sunday, at(8, 0), at(9, 0))).unwrap();
        scheduler.add_class(class("b", Weekday::Monday, at(12, 0), at(13, 0))).unwrap();
        scheduler.add_class(class("a", Weekday::Monday, at(8, 0), at(9, 0))).unwrap();

        let ids: Vec<String> = scheduler.all_classes().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = Scheduler::open(ScheduleIndex::new(), storage_in(&dir));
        scheduler.add_class(class("1", Weekday::Monday, at(9, 0), at(10, 0))).unwrap();
        scheduler.clear_all().unwrap();
        assert!(scheduler.all_classes().is_empty());

        let reopened = Scheduler::open(ScheduleIndex::new(), storage_in(&dir));
        assert!(reopened.all_classes().is_empty());
    }
}
