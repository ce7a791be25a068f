//! GetSpeakerScheduleHandler - Query handler for a speaker's assignments.

use std::sync::Arc;

use crate::application::handlers::support::require;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::participant::{ScheduleEntry, Speaker};
use crate::ports::KeyedStore;

/// Query for one speaker's schedule.
#[derive(Debug, Clone)]
pub struct GetSpeakerScheduleQuery {
    pub speaker_id: UserId,
}

/// Handler returning schedule entries in start order.
pub struct GetSpeakerScheduleHandler {
    speakers: Arc<dyn KeyedStore<Speaker>>,
}

impl GetSpeakerScheduleHandler {
    pub fn new(speakers: Arc<dyn KeyedStore<Speaker>>) -> Self {
        Self { speakers }
    }

    pub async fn handle(&self, query: GetSpeakerScheduleQuery) -> Result<Vec<ScheduleEntry>, DomainError> {
        let speaker = require(self.speakers.as_ref(), "Speaker", query.speaker_id.as_str()).await?;
        Ok(speaker.schedule().copied().collect())
    }
}
