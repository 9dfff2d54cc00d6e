//! Derived scheduling results: conflicts and free slots.

use serde::Serialize;

use super::{ClassSession, ClockTime, Weekday};

/// Outcome of a conflict check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConflictInfo {
    pub has_conflict: bool,
    /// The session that blocked the attempt
    pub conflicting_class: Option<ClassSession>,
    /// Human-readable explanation
    pub message: Option<String>,
}

impl ConflictInfo {
    /// No conflict.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Conflict against `existing`, citing its course and time range.
    pub fn blocked_by(existing: &ClassSession) -> Self {
        Self {
            has_conflict: true,
            message: Some(format!(
                "Conflicts with {} ({})",
                existing.course_name,
                existing.time_range()
            )),
            conflicting_class: Some(existing.clone()),
        }
    }
}

/// An open gap inside the daily operating window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub day: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Minutes between start and end
    pub duration: u32,
}

impl FreeSlot {
    pub fn new(day: Weekday, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            day,
            start_time,
            end_time,
            duration: start_time.minutes_until(end_time),
        }
    }

    /// Duration as "2h", "45m" or "1h 30m".
    pub fn duration_str(&self) -> String {
        format_duration(self.duration)
    }
}

/// Render a minute count the way the slot finder shows it.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(90), "1h 30m");
    }

    #[test]
    fn test_blocked_by_message() {
        let existing = ClassSession::new(
            "Algorithms",
            Weekday::Monday,
            ClockTime::from_hm(9, 0).unwrap(),
            ClockTime::from_hm(10, 0).unwrap(),
            "Room 101",
            "#3B82F6",
        );
        let info = ConflictInfo::blocked_by(&existing);
        assert!(info.has_conflict);
        assert_eq!(info.message.as_deref(), Some("Conflicts with Algorithms (09:00-10:00)"));
        assert_eq!(info.conflicting_class, Some(existing));
    }
}
