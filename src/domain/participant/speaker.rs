//! Speaker aggregate and its personal schedule.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, SessionId, TimeWindow, UserId};

/// One assignment in a speaker's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub session_id: SessionId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduleEntry {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::spanning(self.start, self.end)
    }
}

/// Speaker aggregate.
///
/// # Invariants
///
/// - schedule entries are keyed by their start instant
/// - no two entries overlap (boundary-inclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    id: UserId,
    name: String,
    email: String,
    schedule: BTreeMap<NaiveDateTime, ScheduleEntry>,
}

impl Speaker {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            schedule: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Entries ordered by start instant.
    pub fn schedule(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.schedule.values()
    }

    pub fn assignment_for(&self, session_id: &SessionId) -> Option<&ScheduleEntry> {
        self.schedule.values().find(|e| &e.session_id == session_id)
    }

    /// Adds a session to the schedule.
    ///
    /// # Errors
    ///
    /// - `AssignmentFailed` if the window conflicts with another entry
    pub fn assign(&mut self, session_id: SessionId, window: TimeWindow) -> Result<(), DomainError> {
        if let Some(clash) = self
            .schedule
            .values()
            .find(|e| e.session_id != session_id && e.window().conflicts_with(&window))
        {
            return Err(DomainError::assignment(format!(
                "Speaker {} is already assigned to session {} at {}",
                self.id,
                clash.session_id,
                clash.window()
            )));
        }

        self.unassign(&session_id);
        self.schedule.insert(
            window.start(),
            ScheduleEntry {
                session_id,
                start: window.start(),
                end: window.end(),
            },
        );
        Ok(())
    }

    /// Removes a session from the schedule, returning the removed entry.
    pub fn unassign(&mut self, session_id: &SessionId) -> Option<ScheduleEntry> {
        let key = self
            .schedule
            .iter()
            .find(|(_, e)| &e.session_id == session_id)
            .map(|(k, _)| *k)?;
        self.schedule.remove(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use chrono::{NaiveDate, NaiveTime};

    fn window(sh: u32, eh: u32) -> TimeWindow {
        TimeWindow::on(
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            NaiveTime::from_hms_opt(sh, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(eh, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn speaker() -> Speaker {
        Speaker::new(UserId::new("speaker-1").unwrap(), "Ada", "ada@example.com")
    }

    #[test]
    fn assign_adds_entry_keyed_by_start() {
        let mut s = speaker();
        let session = SessionId::new();
        s.assign(session, window(10, 11)).unwrap();

        let entry = s.assignment_for(&session).unwrap();
        assert_eq!(entry.start, window(10, 11).start());
        assert_eq!(s.schedule().count(), 1);
    }

    #[test]
    fn assign_rejects_touching_slot() {
        let mut s = speaker();
        s.assign(SessionId::new(), window(10, 11)).unwrap();

        let err = s.assign(SessionId::new(), window(11, 12)).unwrap_err();
        assert_eq!(err.code, ErrorCode::AssignmentFailed);
        assert_eq!(s.schedule().count(), 1);
    }

    #[test]
    fn reassigning_same_session_moves_entry() {
        let mut s = speaker();
        let session = SessionId::new();
        s.assign(session, window(10, 11)).unwrap();
        s.assign(session, window(10, 12)).unwrap();

        assert_eq!(s.schedule().count(), 1);
        assert_eq!(s.assignment_for(&session).unwrap().end, window(10, 12).end());
    }

    #[test]
    fn unassign_returns_removed_entry() {
        let mut s = speaker();
        let session = SessionId::new();
        s.assign(session, window(9, 10)).unwrap();

        let removed = s.unassign(&session).unwrap();
        assert_eq!(removed.session_id, session);
        assert!(s.unassign(&session).is_none());
    }

    #[test]
    fn schedule_survives_json() {
        let mut s = speaker();
        s.assign(SessionId::new(), window(9, 10)).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: Speaker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
