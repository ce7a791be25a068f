//! Session aggregate entity.
//!
//! A session is a single talk inside a conference, delivered by one
//! speaker in one room on one day.
//!
//! # Ownership
//!
//! Sessions reference their conference and speaker by ID but do NOT own
//! them. Speaker and attendee schedule entries are maintained by the
//! session workflows in the application layer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::{
    ConferenceId, DomainError, SessionId, TimeWindow, UserId, ValidationError,
};

/// Maximum length for a session name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Caller-supplied session fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetails {
    pub name: String,
    pub description: String,
    pub room: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SessionDetails {
    /// Validates field contents and returns the session's time window.
    pub fn validate(&self) -> Result<TimeWindow, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_NAME_LENGTH as i32,
                name.chars().count() as i32,
            ));
        }
        if self.room.trim().is_empty() {
            return Err(ValidationError::empty_field("room"));
        }
        TimeWindow::on(self.date, self.start_time, self.end_time)
    }
}

/// Session aggregate.
///
/// # Invariants
///
/// - `start_time < end_time`
/// - `name` is non-empty and at most `MAX_NAME_LENGTH` characters
/// - every key of `attendance` is also in `registered_attendees`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    conference_id: ConferenceId,
    speaker_id: UserId,
    name: String,
    description: String,
    room: String,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    registered_attendees: BTreeSet<UserId>,
    attendance: BTreeMap<UserId, bool>,
}

impl Session {
    /// Create a new session with no registered attendees.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a field is empty or the times are inverted
    pub fn new(
        id: SessionId,
        conference_id: ConferenceId,
        speaker_id: UserId,
        details: SessionDetails,
    ) -> Result<Self, DomainError> {
        details.validate()?;
        Ok(Self {
            id,
            conference_id,
            speaker_id,
            name: details.name.trim().to_string(),
            description: details.description,
            room: details.room,
            date: details.date,
            start_time: details.start_time,
            end_time: details.end_time,
            registered_attendees: BTreeSet::new(),
            attendance: BTreeMap::new(),
        })
    }

    /// Returns a copy with new details and speaker, keeping id, conference,
    /// registrations and attendance.
    pub fn revised(&self, speaker_id: UserId, details: SessionDetails) -> Result<Self, DomainError> {
        let mut revised = Self::new(self.id, self.conference_id, speaker_id, details)?;
        revised.registered_attendees = self.registered_attendees.clone();
        revised.attendance = self.attendance.clone();
        Ok(revised)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn conference_id(&self) -> &ConferenceId {
        &self.conference_id
    }

    pub fn speaker_id(&self) -> &UserId {
        &self.speaker_id
    }

    /// The caller-editable fields, as accepted by [`Session::revised`].
    pub fn details(&self) -> SessionDetails {
        SessionDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            room: self.room.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// The instant the session starts; used as the schedule key.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// The session's closed time window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::spanning(self.starts_at(), self.date.and_time(self.end_time))
    }

    pub fn registered_attendees(&self) -> &BTreeSet<UserId> {
        &self.registered_attendees
    }

    pub fn is_registered(&self, attendee_id: &UserId) -> bool {
        self.registered_attendees.contains(attendee_id)
    }

    /// Attendance flag for an attendee, `None` if never recorded.
    pub fn attendance_of(&self, attendee_id: &UserId) -> Option<bool> {
        self.attendance.get(attendee_id).copied()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers an attendee. Returns false if already registered.
    pub fn register_attendee(&mut self, attendee_id: UserId) -> bool {
        self.registered_attendees.insert(attendee_id)
    }

    /// Removes an attendee and any attendance record. Returns false if absent.
    pub fn unregister_attendee(&mut self, attendee_id: &UserId) -> bool {
        self.attendance.remove(attendee_id);
        self.registered_attendees.remove(attendee_id)
    }

    /// Marks a registered attendee present or absent.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the attendee is not registered
    pub fn mark_attendance(&mut self, attendee_id: &UserId, present: bool) -> Result<(), DomainError> {
        if !self.is_registered(attendee_id) {
            return Err(DomainError::validation(
                "attendee_id",
                format!(
                    "Attendee {} is not registered for session '{}'",
                    attendee_id, self.name
                ),
            ));
        }
        self.attendance.insert(attendee_id.clone(), present);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::details;
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn speaker() -> UserId {
        UserId::new("speaker-1").unwrap()
    }

    fn session() -> Session {
        Session::new(
            SessionId::new(),
            ConferenceId::new(),
            speaker(),
            details("Keynote", day(), (10, 0), (11, 0)),
        )
        .unwrap()
    }

    #[test]
    fn new_session_trims_name_and_has_no_attendees() {
        let s = Session::new(
            SessionId::new(),
            ConferenceId::new(),
            speaker(),
            details("  Keynote  ", day(), (10, 0), (11, 0)),
        )
        .unwrap();

        assert_eq!(s.name(), "Keynote");
        assert!(s.registered_attendees().is_empty());
    }

    #[test]
    fn rejects_inverted_times() {
        let result = Session::new(
            SessionId::new(),
            ConferenceId::new(),
            speaker(),
            details("Keynote", day(), (11, 0), (10, 0)),
        );
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn rejects_empty_name() {
        let result = Session::new(
            SessionId::new(),
            ConferenceId::new(),
            speaker(),
            details("   ", day(), (10, 0), (11, 0)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn starts_at_combines_date_and_start_time() {
        let s = session();
        assert_eq!(s.starts_at(), day().and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(s.window().end(), day().and_hms_opt(11, 0, 0).unwrap());
    }

    #[test]
    fn revised_keeps_identity_and_registrations() {
        let mut s = session();
        let attendee = UserId::new("attendee-1").unwrap();
        s.register_attendee(attendee.clone());
        s.mark_attendance(&attendee, true).unwrap();

        let other = UserId::new("speaker-2").unwrap();
        let r = s
            .revised(other.clone(), details("Closing", day(), (15, 0), (16, 0)))
            .unwrap();

        assert_eq!(r.id(), s.id());
        assert_eq!(r.conference_id(), s.conference_id());
        assert_eq!(r.speaker_id(), &other);
        assert_eq!(r.name(), "Closing");
        assert!(r.is_registered(&attendee));
        assert_eq!(r.attendance_of(&attendee), Some(true));
    }

    #[test]
    fn revising_with_own_details_changes_nothing() {
        let mut s = session();
        s.register_attendee(UserId::new("attendee-1").unwrap());

        let same = s.revised(s.speaker_id().clone(), s.details()).unwrap();
        assert_eq!(same, s);
    }

    #[test]
    fn attendance_requires_registration() {
        let mut s = session();
        let attendee = UserId::new("attendee-1").unwrap();
        assert!(s.mark_attendance(&attendee, true).is_err());

        assert!(s.register_attendee(attendee.clone()));
        assert!(!s.register_attendee(attendee.clone()));
        s.mark_attendance(&attendee, false).unwrap();
        assert_eq!(s.attendance_of(&attendee), Some(false));
    }

    #[test]
    fn unregister_clears_attendance() {
        let mut s = session();
        let attendee = UserId::new("attendee-1").unwrap();
        s.register_attendee(attendee.clone());
        s.mark_attendance(&attendee, true).unwrap();

        assert!(s.unregister_attendee(&attendee));
        assert_eq!(s.attendance_of(&attendee), None);
        assert!(!s.unregister_attendee(&attendee));
    }

    #[test]
    fn round_trips_through_json() {
        let s = session();
        let json = serde_json::to_string(&s).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
