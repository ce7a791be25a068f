//! CreateSessionHandler - Command handler for scheduling a new session.
//!
//! Steps, each undone in reverse if a later one fails:
//! 1. persist the session
//! 2. assign it to the speaker's schedule
//! 3. register it with its conference
//!
//! The speaker is notified once all three have committed.

use std::sync::Arc;

use crate::application::handlers::support::{edit_if_present, edit_record, notice, require};
use crate::application::saga::{Saga, SagaFailure, WorkflowLock};
use crate::domain::conference::Conference;
use crate::domain::foundation::{ConferenceId, DomainError, SessionId, UserId};
use crate::domain::participant::Speaker;
use crate::domain::scheduling::ConflictValidator;
use crate::domain::session::{Session, SessionDetails};
use crate::ports::{KeyedStore, NotificationDispatcher};

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub conference_id: ConferenceId,
    pub speaker_id: UserId,
    pub details: SessionDetails,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: Session,
    pub notifications_scheduled: usize,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    sessions: Arc<dyn KeyedStore<Session>>,
    conferences: Arc<dyn KeyedStore<Conference>>,
    speakers: Arc<dyn KeyedStore<Speaker>>,
    notifier: Arc<dyn NotificationDispatcher>,
    lock: WorkflowLock,
}

impl CreateSessionHandler {
    pub fn new(
        sessions: Arc<dyn KeyedStore<Session>>,
        conferences: Arc<dyn KeyedStore<Conference>>,
        speakers: Arc<dyn KeyedStore<Speaker>>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            sessions,
            conferences,
            speakers,
            notifier,
            lock: WorkflowLock::new(),
        }
    }

    /// Share `lock` with the other workflow handlers.
    pub fn with_lock(mut self, lock: WorkflowLock) -> Self {
        self.lock = lock;
        self
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<CreateSessionResult, DomainError> {
        let _guard = self.lock.acquire().await;

        // 1. Load collaborators
        let conference = require(
            self.conferences.as_ref(),
            "Conference",
            &cmd.conference_id.to_string(),
        )
        .await?;
        let speaker = require(self.speakers.as_ref(), "Speaker", cmd.speaker_id.as_str()).await?;

        // 2. Build and validate
        let session = Session::new(SessionId::new(), cmd.conference_id, cmd.speaker_id, cmd.details)?;
        let siblings = self.sessions.find_all().await;
        ConflictValidator::check_session(&session, &conference, &siblings, &speaker)?;

        // 3. Run the workflow
        let session_key = session.id().to_string();
        let speaker_key = speaker.id().as_str().to_string();
        let conference_key = conference.id().to_string();
        let session_id = *session.id();
        let window = session.window();

        let sessions = &self.sessions;
        let speakers = &self.speakers;
        let conferences = &self.conferences;

        Saga::new("create_session")
            .step(
                "persist_session",
                {
                    let (key, session) = (session_key.clone(), session.clone());
                    move || async move { sessions.save(&key, &session).await.map_err(DomainError::from) }
                },
                {
                    let key = session_key.clone();
                    move || async move { sessions.delete(&key).await.map_err(DomainError::from) }
                },
            )
            .step(
                "assign_speaker",
                {
                    let key = speaker_key.clone();
                    move || async move {
                        edit_record(speakers.as_ref(), "Speaker", &key, |s: &mut Speaker| {
                            s.assign(session_id, window).map(|()| true)
                        })
                        .await
                        .map(drop)
                        .map_err(|e| {
                            DomainError::assignment(format!("Could not assign speaker {}: {}", key, e.message))
                        })
                    }
                },
                {
                    let key = speaker_key.clone();
                    move || async move { unassign(speakers.as_ref(), &key, session_id).await }
                },
            )
            .step(
                "register_in_conference",
                {
                    let key = conference_key.clone();
                    move || async move {
                        edit_record(conferences.as_ref(), "Conference", &key, |c: &mut Conference| {
                            Ok(c.add_session(session_id))
                        })
                        .await
                        .map(drop)
                    }
                },
                {
                    let key = conference_key.clone();
                    move || async move {
                        edit_if_present(conferences.as_ref(), &key, |c: &mut Conference| {
                            Ok(c.remove_session(&session_id))
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .run()
            .await
            .map_err(SagaFailure::into_error)?;

        tracing::info!(session_id = %session_id, conference_id = %conference_key, "Session created");

        // 4. Notify (fire-and-forget)
        let notifications_scheduled = self.notifier.dispatch(vec![notice(
            speaker.email(),
            speaker.name(),
            format!("Session scheduled: {}", session.name()),
            format!(
                "You are presenting '{}' in {} on {}.",
                session.name(),
                session.room(),
                session.window()
            ),
        )]);

        Ok(CreateSessionResult {
            session,
            notifications_scheduled,
        })
    }
}

/// Remove `session_id` from the stored speaker's schedule, if present.
async fn unassign(
    speakers: &dyn KeyedStore<Speaker>,
    key: &str,
    session_id: SessionId,
) -> Result<(), DomainError> {
    edit_if_present(speakers, key, |s: &mut Speaker| Ok(s.unassign(&session_id).is_some()))
        .await
        .map(drop)
}
