//! Conflict Validator - scheduling rules for sessions and conferences.
//!
//! All interval checks use the boundary-inclusive rule from
//! [`TimeWindow::conflicts_with`] / [`DateRange::conflicts_with`].

use chrono::NaiveDate;

use crate::domain::conference::Conference;
use crate::domain::foundation::{DateRange, DomainError, SessionId, TimeWindow};
use crate::domain::participant::{ScheduleEntry, Speaker};
use crate::domain::session::Session;

/// Scheduling conflict checks.
pub struct ConflictValidator;

impl ConflictValidator {
    /// True if `name` matches any sibling name, ignoring case and
    /// surrounding whitespace.
    pub fn name_taken<'a, I>(name: &str, sibling_names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted = name.trim().to_lowercase();
        sibling_names
            .into_iter()
            .any(|n| n.trim().to_lowercase() == wanted)
    }

    /// False iff any existing assignment conflicts with `window`.
    pub fn speaker_available<'a, I>(window: &TimeWindow, schedule: I) -> bool
    where
        I: IntoIterator<Item = &'a ScheduleEntry>,
    {
        !schedule
            .into_iter()
            .any(|entry| entry.window().conflicts_with(window))
    }

    /// False iff any sibling session conflicts with `window`.
    pub fn time_slot_free<'a, I>(window: &TimeWindow, siblings: I) -> bool
    where
        I: IntoIterator<Item = &'a Session>,
    {
        !siblings
            .into_iter()
            .any(|s| s.window().conflicts_with(window))
    }

    /// True if `date` falls inside the conference period, bounds included.
    pub fn within_conference_bounds(date: NaiveDate, period: &DateRange) -> bool {
        period.contains(date)
    }

    /// False iff any other conference's period conflicts with `period`.
    pub fn conference_period_free<'a, I>(period: &DateRange, conferences: I) -> bool
    where
        I: IntoIterator<Item = &'a Conference>,
    {
        !conferences
            .into_iter()
            .any(|c| c.period().conflicts_with(period))
    }

    /// Runs every session rule for `candidate`.
    ///
    /// `candidate` itself is excluded from `conference_sessions` and from
    /// the speaker's schedule before checking, so re-validating an
    /// unchanged session never conflicts with itself.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` with the first rule that rejected the session
    pub fn check_session(
        candidate: &Session,
        conference: &Conference,
        conference_sessions: &[Session],
        speaker: &Speaker,
    ) -> Result<(), DomainError> {
        let own_id = candidate.id();
        let siblings: Vec<&Session> = Self::excluding(conference_sessions, own_id)
            .filter(|s| s.conference_id() == conference.id())
            .collect();

        if !Self::within_conference_bounds(candidate.date(), &conference.period()) {
            return Err(DomainError::validation(
                "date",
                format!(
                    "Session date {} is outside conference '{}' ({})",
                    candidate.date(),
                    conference.name(),
                    conference.period()
                ),
            ));
        }

        if Self::name_taken(candidate.name(), siblings.iter().map(|s| s.name())) {
            return Err(DomainError::validation(
                "name",
                format!(
                    "A session named '{}' already exists in conference '{}'",
                    candidate.name(),
                    conference.name()
                ),
            ));
        }

        let window = candidate.window();
        if !Self::time_slot_free(&window, siblings.iter().copied()) {
            return Err(DomainError::validation(
                "start_time",
                format!("Time slot {} conflicts with another session", window),
            ));
        }

        let schedule = speaker.schedule().filter(|e| &e.session_id != own_id);
        if !Self::speaker_available(&window, schedule) {
            return Err(DomainError::validation(
                "speaker_id",
                format!("Speaker {} is not available at {}", speaker.id(), window),
            ));
        }

        Ok(())
    }

    /// Runs every conference rule for `candidate` against all stored
    /// conferences, excluding the candidate itself.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the name is taken or the period overlaps
    pub fn check_conference(candidate: &Conference, existing: &[Conference]) -> Result<(), DomainError> {
        let others: Vec<&Conference> = existing.iter().filter(|c| c.id() != candidate.id()).collect();

        if Self::name_taken(candidate.name(), others.iter().map(|c| c.name())) {
            return Err(DomainError::validation(
                "name",
                format!("A conference named '{}' already exists", candidate.name()),
            ));
        }

        if !Self::conference_period_free(&candidate.period(), others.iter().copied()) {
            return Err(DomainError::validation(
                "start_date",
                format!(
                    "Conference period {} overlaps an existing conference",
                    candidate.period()
                ),
            ));
        }

        Ok(())
    }

    fn excluding<'a>(
        sessions: &'a [Session],
        id: &'a SessionId,
    ) -> impl Iterator<Item = &'a Session> + 'a {
        sessions.iter().filter(move |s| s.id() != id)
    }
}
