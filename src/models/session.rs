//! Class session data.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ClockTime, Weekday};

/// A timed class on one weekday.
///
/// Times are expected to satisfy `start_time < end_time`; the form layer
/// checks this before a session ever reaches the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    /// Unique identifier
    pub id: String,
    /// Course name shown on the calendar (e.g., "Algorithms")
    pub course_name: String,
    pub day: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Room or building
    pub location: String,
    /// Display color as "#RRGGBB"
    pub color: String,
    /// Optional free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClassSession {
    /// Create a session with a freshly generated identifier.
    pub fn new(
        course_name: impl Into<String>,
        day: Weekday,
        start_time: ClockTime,
        end_time: ClockTime,
        location: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            course_name: course_name.into(),
            day,
            start_time,
            end_time,
            location: location.into(),
            color: color.into(),
            description: None,
        }
    }

    /// Replace the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach a description; blank text clears it.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Whether the two `[start, end)` intervals overlap.
    ///
    /// Ignores the weekday; callers compare sessions from the same bucket.
    pub fn overlaps(&self, other: &ClassSession) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }

    /// Length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.start_time.minutes_until(self.end_time)
    }

    /// Range label, e.g. "09:00-10:30".
    pub fn time_range(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }
}

/// Millisecond timestamp plus a random suffix.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen();
    format!("{}-{:04x}", millis, suffix)
}
