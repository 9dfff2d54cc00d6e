//! Sessions for a single weekday, kept sorted by start time.

use crate::models::ClassSession;

/// Ordered sessions for one day.
///
/// Insertion is a linear scan; a day only ever holds a handful of classes.
/// Sessions with equal start times stay in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DayBucket {
    sessions: Vec<ClassSession>,
}

impl DayBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every session starting at or before this one.
    ///
    /// Does not check for overlaps.
    pub fn insert(&mut self, session: ClassSession) {
        let position = self
            .sessions
            .iter()
            .position(|s| s.start_time > session.start_time)
            .unwrap_or(self.sessions.len());
        self.sessions.insert(position, session);
    }

    /// Remove the first session with this id.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.sessions.iter().position(|s| s.id == id) {
            Some(index) => {
                self.sessions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Look up a session by id.
    pub fn get(&self, id: &str) -> Option<&ClassSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Snapshot in start-time order.
    pub fn to_vec(&self) -> Vec<ClassSession> {
        self.sessions.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassSession> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
