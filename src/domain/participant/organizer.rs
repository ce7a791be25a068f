//! Organizer aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{ConferenceId, UserId};

/// Organizer aggregate: a participant who manages conferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    id: UserId,
    name: String,
    email: String,
    conference_ids: BTreeSet<ConferenceId>,
}

impl Organizer {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            conference_ids: BTreeSet::new(),
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

    pub fn conference_ids(&self) -> &BTreeSet<ConferenceId> {
        &self.conference_ids
    }

    pub fn manages(&self, conference_id: &ConferenceId) -> bool {
        self.conference_ids.contains(conference_id)
    }

    pub fn add_conference(&mut self, conference_id: ConferenceId) -> bool {
        self.conference_ids.insert(conference_id)
    }

    pub fn remove_conference(&mut self, conference_id: &ConferenceId) -> bool {
        self.conference_ids.remove(conference_id)
    }
}
