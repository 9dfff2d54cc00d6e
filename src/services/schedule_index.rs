//! Weekly schedule index - conflict detection and free-slot search.

use tracing::debug;

use crate::models::{ClassSession, ClockTime, ConflictInfo, FreeSlot, Weekday};

use super::DayBucket;

/// Start of the daily window searched for free slots (07:00).
pub const DAY_OPEN: ClockTime = ClockTime::at_hour(7);
/// End of the daily window searched for free slots (21:00).
pub const DAY_CLOSE: ClockTime = ClockTime::at_hour(21);

/// One bucket per weekday; the entry point for every schedule operation.
#[derive(Debug, Clone)]
pub struct ScheduleIndex {
    buckets: [DayBucket; 7],
    open: ClockTime,
    close: ClockTime,
}

impl Default for ScheduleIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleIndex {
    /// Empty schedule using the default 07:00-21:00 window.
    pub fn new() -> Self {
        Self::with_window(DAY_OPEN, DAY_CLOSE)
    }

    /// Empty schedule with a custom free-slot window.
    pub fn with_window(open: ClockTime, close: ClockTime) -> Self {
        Self {
            buckets: std::array::from_fn(|_| DayBucket::new()),
            open,
            close,
        }
    }

    /// The free-slot window as `(open, close)`.
    pub fn window(&self) -> (ClockTime, ClockTime) {
        (self.open, self.close)
    }

    fn bucket(&self, day: Weekday) -> &DayBucket {
        &self.buckets[day.index()]
    }

    fn bucket_mut(&mut self, day: Weekday) -> &mut DayBucket {
        &mut self.buckets[day.index()]
    }

    /// Insert the session unless it overlaps another on the same day.
    ///
    /// An existing session with the same id is ignored by the check.
    pub fn add_session(&mut self, session: ClassSession) -> ConflictInfo {
        let conflict = self.detect_conflict(&session);
        if conflict.has_conflict {
            debug!(id = %session.id, day = %session.day, "rejected conflicting session");
        } else {
            self.bucket_mut(session.day).insert(session);
        }
        conflict
    }

    /// Remove a session from the given day.
    pub fn remove_session(&mut self, day: Weekday, id: &str) -> bool {
        self.bucket_mut(day).remove(id)
    }

    /// Replace the stored session that shares `updated`'s id.
    ///
    /// The old version may live on a different day. If the new version
    /// conflicts, the old one is put back untouched.
    pub fn update_session(&mut self, updated: ClassSession) -> ConflictInfo {
        let previous = self.find(&updated.id).cloned();
        if let Some(previous) = &previous {
            self.remove_session(previous.day, &previous.id);
        }

        let conflict = self.add_session(updated);
        if conflict.has_conflict {
            if let Some(previous) = previous {
                debug!(id = %previous.id, "restoring session after failed update");
                self.bucket_mut(previous.day).insert(previous);
            }
        }
        conflict
    }

    /// Find a session by id on any day.
    pub fn find(&self, id: &str) -> Option<&ClassSession> {
        self.buckets.iter().find_map(|bucket| bucket.get(id))
    }

    /// Sessions for one day in start-time order.
    pub fn sessions_for_day(&self, day: Weekday) -> Vec<ClassSession> {
        self.bucket(day).to_vec()
    }

    /// Every stored session.
    ///
    /// Happens to be grouped by weekday; sort explicitly if order matters.
    pub fn all_sessions(&self) -> Vec<ClassSession> {
        self.buckets.iter().flat_map(|b| b.iter().cloned()).collect()
    }

    /// Check `session` against its day without modifying anything.
    pub fn detect_conflict(&self, session: &ClassSession) -> ConflictInfo {
        self.bucket(session.day)
            .iter()
            .filter(|existing| existing.id != session.id)
            .find(|existing| session.overlaps(existing))
            .map(ConflictInfo::blocked_by)
            .unwrap_or_else(ConflictInfo::clear)
    }

    /// Gaps of at least `min_duration` minutes inside the daily window.
    ///
    /// Days are scanned in `days` order when given, otherwise Monday to
    /// Sunday. The result is sorted longest first; equal durations keep
    /// the order they were found in.
    pub fn suggest_free_slots(&self, min_duration: u32, days: Option<&[Weekday]>) -> Vec<FreeSlot> {
        let min_duration = min_duration.max(1);
        let days = days.unwrap_or(&Weekday::ALL);
        let mut slots = Vec::new();

        for &day in days {
            let mut cursor = self.open;

            for session in self.bucket(day).iter() {
                let start = session.start_time.min(self.close);
                if cursor.minutes_until(start) >= min_duration {
                    slots.push(FreeSlot::new(day, cursor, start));
                }
                cursor = cursor.max(session.end_time);
            }

            if cursor.minutes_until(self.close) >= min_duration {
                slots.push(FreeSlot::new(day, cursor, self.close));
            }
        }

        // sort_by is stable, so ties stay in discovery order
        slots.sort_by(|a, b| b.duration.cmp(&a.duration));
        debug!(count = slots.len(), min_duration, "suggested free slots");
        slots
    }

    /// Total number of stored sessions.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(DayBucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(DayBucket::is_empty)
    }

    /// Drop every session on every day.
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}
