//! ListConferenceSessionsHandler - Query handler for a conference's program.

use std::sync::Arc;

use crate::application::handlers::support::require;
use crate::domain::conference::Conference;
use crate::domain::foundation::{ConferenceId, DomainError};
use crate::domain::session::Session;
use crate::ports::KeyedStore;

/// Query for the sessions of one conference.
#[derive(Debug, Clone)]
pub struct ListConferenceSessionsQuery {
    pub conference_id: ConferenceId,
}

/// Handler returning sessions ordered by date, then start time.
pub struct ListConferenceSessionsHandler {
    sessions: Arc<dyn KeyedStore<Session>>,
    conferences: Arc<dyn KeyedStore<Conference>>,
}

impl ListConferenceSessionsHandler {
    pub fn new(
        sessions: Arc<dyn KeyedStore<Session>>,
        conferences: Arc<dyn KeyedStore<Conference>>,
    ) -> Self {
        Self {
            sessions,
            conferences,
        }
    }

    pub async fn handle(&self, query: ListConferenceSessionsQuery) -> Result<Vec<Session>, DomainError> {
        require(
            self.conferences.as_ref(),
            "Conference",
            &query.conference_id.to_string(),
        )
        .await?;

        let mut sessions: Vec<Session> = self
            .sessions
            .find_all()
            .await
            .into_iter()
            .filter(|s| s.conference_id() == &query.conference_id)
            .collect();
        sessions.sort_by_key(|s| (s.date(), s.start_time(), s.name().to_string()));
        Ok(sessions)
    }
}
