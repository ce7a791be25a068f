//! Conference aggregate entity.
//!
//! A conference is a dated container of sessions. It keeps registries of
//! the sessions, speakers, attendees and feedback attached to it; those
//! registries are maintained by the application workflows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{
    ConferenceId, DateRange, DomainError, FeedbackId, SessionId, UserId, ValidationError,
};

/// Maximum length for a conference name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Conference aggregate.
///
/// # Invariants
///
/// - `start_date < end_date`
/// - `name` is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    id: ConferenceId,
    organizer_id: UserId,
    name: String,
    description: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    session_ids: BTreeSet<SessionId>,
    attendee_ids: BTreeSet<UserId>,
    speaker_ids: BTreeSet<UserId>,
    feedback_ids: BTreeSet<FeedbackId>,
}

impl Conference {
    /// Create a new, empty conference.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if name is empty/too long or dates are not ordered
    pub fn new(
        id: ConferenceId,
        organizer_id: UserId,
        name: String,
        description: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name").into());
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_NAME_LENGTH as i32,
                name.chars().count() as i32,
            )
            .into());
        }
        DateRange::new(start_date, end_date)?;

        Ok(Self {
            id,
            organizer_id,
            name,
            description,
            start_date,
            end_date,
            session_ids: BTreeSet::new(),
            attendee_ids: BTreeSet::new(),
            speaker_ids: BTreeSet::new(),
            feedback_ids: BTreeSet::new(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConferenceId {
        &self.id
    }

    pub fn organizer_id(&self) -> &UserId {
        &self.organizer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// The conference's closed date range.
    pub fn period(&self) -> DateRange {
        DateRange::spanning(self.start_date, self.end_date)
    }

    pub fn session_ids(&self) -> &BTreeSet<SessionId> {
        &self.session_ids
    }

    pub fn attendee_ids(&self) -> &BTreeSet<UserId> {
        &self.attendee_ids
    }

    pub fn speaker_ids(&self) -> &BTreeSet<UserId> {
        &self.speaker_ids
    }

    pub fn feedback_ids(&self) -> &BTreeSet<FeedbackId> {
        &self.feedback_ids
    }

    pub fn has_session(&self, session_id: &SessionId) -> bool {
        self.session_ids.contains(session_id)
    }

    pub fn has_speaker(&self, speaker_id: &UserId) -> bool {
        self.speaker_ids.contains(speaker_id)
    }

    pub fn has_attendee(&self, attendee_id: &UserId) -> bool {
        self.attendee_ids.contains(attendee_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registry mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a session. Returns false if it was already registered.
    pub fn add_session(&mut self, session_id: SessionId) -> bool {
        self.session_ids.insert(session_id)
    }

    pub fn remove_session(&mut self, session_id: &SessionId) -> bool {
        self.session_ids.remove(session_id)
    }

    pub fn add_speaker(&mut self, speaker_id: UserId) -> bool {
        self.speaker_ids.insert(speaker_id)
    }

    pub fn remove_speaker(&mut self, speaker_id: &UserId) -> bool {
        self.speaker_ids.remove(speaker_id)
    }

    pub fn add_attendee(&mut self, attendee_id: UserId) -> bool {
        self.attendee_ids.insert(attendee_id)
    }

    pub fn remove_attendee(&mut self, attendee_id: &UserId) -> bool {
        self.attendee_ids.remove(attendee_id)
    }

    pub fn add_feedback(&mut self, feedback_id: FeedbackId) -> bool {
        self.feedback_ids.insert(feedback_id)
    }

    pub fn remove_feedback(&mut self, feedback_id: &FeedbackId) -> bool {
        self.feedback_ids.remove(feedback_id)
    }
}
