//! Attendee aggregate and its registered-session schedule.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, SessionId, UserId};

/// Attendee aggregate.
///
/// The schedule holds one entry per registered session, keyed by the
/// session's start instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    id: UserId,
    name: String,
    email: String,
    schedule: BTreeMap<NaiveDateTime, SessionId>,
}

impl Attendee {
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

    /// Registered sessions with their start instants, in start order.
    pub fn schedule(&self) -> impl Iterator<Item = (&NaiveDateTime, &SessionId)> {
        self.schedule.iter()
    }

    pub fn is_attending(&self, session_id: &SessionId) -> bool {
        self.schedule.values().any(|s| s == session_id)
    }

    /// Adds a session to the schedule at `starts_at`.
    ///
    /// # Errors
    ///
    /// - `AssignmentFailed` if another session already starts at that instant
    pub fn add_session(&mut self, session_id: SessionId, starts_at: NaiveDateTime) -> Result<(), DomainError> {
        if let Some(existing) = self.schedule.get(&starts_at) {
            if existing != &session_id {
                return Err(DomainError::assignment(format!(
                    "Attendee {} already has session {} starting at {}",
                    self.id, existing, starts_at
                )));
            }
        }
        self.remove_session(&session_id);
        self.schedule.insert(starts_at, session_id);
        Ok(())
    }

    /// Removes a session, returning the start instant it was keyed by.
    pub fn remove_session(&mut self, session_id: &SessionId) -> Option<NaiveDateTime> {
        let key = self
            .schedule
            .iter()
            .find(|(_, s)| *s == session_id)
            .map(|(k, _)| *k)?;
        self.schedule.remove(&key);
        Some(key)
    }
}
