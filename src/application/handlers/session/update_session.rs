//! UpdateSessionHandler - Command handler for revising a session.
//!
//! The session is re-validated with itself excluded from its siblings and
//! from the speaker's schedule. Each step re-reads the record it changes;
//! its compensation puts back only what the step changed.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::application::handlers::support::{
    edit_each, edit_if_present, edit_record, notice, require, revert_each,
};
use crate::application::saga::{Saga, SagaFailure, WorkflowLock};
use crate::domain::conference::Conference;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::participant::{Attendee, Speaker};
use crate::domain::scheduling::ConflictValidator;
use crate::domain::session::{Session, SessionDetails};
use crate::ports::{KeyedStore, NotificationDispatcher};

/// Command to update an existing session.
///
/// The conference cannot change; the speaker can.
#[derive(Debug, Clone)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub speaker_id: UserId,
    pub details: SessionDetails,
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdateSessionResult {
    pub previous: Session,
    pub session: Session,
    pub notifications_scheduled: usize,
}

/// Handler for updating sessions.
pub struct UpdateSessionHandler {
    sessions: Arc<dyn KeyedStore<Session>>,
    conferences: Arc<dyn KeyedStore<Conference>>,
    speakers: Arc<dyn KeyedStore<Speaker>>,
    attendees: Arc<dyn KeyedStore<Attendee>>,
    notifier: Arc<dyn NotificationDispatcher>,
    lock: WorkflowLock,
}

impl UpdateSessionHandler {
    pub fn new(
        sessions: Arc<dyn KeyedStore<Session>>,
        conferences: Arc<dyn KeyedStore<Conference>>,
        speakers: Arc<dyn KeyedStore<Speaker>>,
        attendees: Arc<dyn KeyedStore<Attendee>>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            sessions,
            conferences,
            speakers,
            attendees,
            notifier,
            lock: WorkflowLock::new(),
        }
    }

    /// Share `lock` with the other workflow handlers.
    pub fn with_lock(mut self, lock: WorkflowLock) -> Self {
        self.lock = lock;
        self
    }

    pub async fn handle(&self, cmd: UpdateSessionCommand) -> Result<UpdateSessionResult, DomainError> {
        let _guard = self.lock.acquire().await;
        let session_key = cmd.session_id.to_string();

        // 1. Load the session and everything it links to
        let previous = require(self.sessions.as_ref(), "Session", &session_key).await?;
        let conference_key = previous.conference_id().to_string();
        let conference = require(self.conferences.as_ref(), "Conference", &conference_key).await?;
        let new_speaker = require(self.speakers.as_ref(), "Speaker", cmd.speaker_id.as_str()).await?;
        let old_speaker = if previous.speaker_id() == &cmd.speaker_id {
            None
        } else {
            Some(require(self.speakers.as_ref(), "Speaker", previous.speaker_id().as_str()).await?)
        };

        // 2. Revise and validate, excluding the session from its own siblings
        let session = previous.revised(cmd.speaker_id.clone(), cmd.details.clone())?;
        let siblings = self.sessions.find_all().await;
        ConflictValidator::check_session(&session, &conference, &siblings, &new_speaker)?;

        let session_id = *session.id();
        let window = session.window();
        let mut candidate = new_speaker.clone();
        candidate.assign(session_id, window)?;
        // where the new speaker held the session before, if anywhere
        let prior_window = new_speaker.assignment_for(&session_id).map(|e| e.window());
        let released_window = old_speaker
            .as_ref()
            .and_then(|s| s.assignment_for(&session_id))
            .map(|e| e.window());
        let needs_registration = !conference.has_session(&session_id);

        let old_start = previous.starts_at();
        let new_start = session.starts_at();
        let moved = old_start != new_start;
        let registered = self.registered_attendees(&session).await;
        let holding: Vec<String> = if moved {
            holders_free_at(&registered, session_id, new_start)?
        } else {
            Vec::new()
        };

        // 3. Run the workflow
        let sessions = &self.sessions;
        let speakers = &self.speakers;
        let conferences = &self.conferences;
        let attendees = &self.attendees;
        let new_speaker_key = new_speaker.id().as_str().to_string();
        let old_speaker_key = previous.speaker_id().as_str().to_string();
        let to_new_start = move |a: &mut Attendee| a.add_session(session_id, new_start).map(|()| true);
        let to_old_start = move |a: &mut Attendee| a.add_session(session_id, old_start).map(|()| true);

        Saga::new("update_session")
            .step(
                "persist_session",
                {
                    let (key, speaker_id, details) = (session_key.clone(), cmd.speaker_id.clone(), cmd.details.clone());
                    move || async move {
                        edit_record(sessions.as_ref(), "Session", &key, move |s: &mut Session| {
                            *s = s.revised(speaker_id, details)?;
                            Ok(true)
                        })
                        .await
                        .map(drop)
                    }
                },
                {
                    let (key, speaker_id, details) =
                        (session_key.clone(), previous.speaker_id().clone(), previous.details());
                    move || async move {
                        edit_if_present(sessions.as_ref(), &key, move |s: &mut Session| {
                            *s = s.revised(speaker_id, details)?;
                            Ok(true)
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .step_if(
                released_window.is_some(),
                "release_previous_speaker",
                {
                    let key = old_speaker_key.clone();
                    move || async move {
                        edit_record(speakers.as_ref(), "Speaker", &key, |s: &mut Speaker| {
                            Ok(s.unassign(&session_id).is_some())
                        })
                        .await
                        .map(drop)
                        .map_err(|e| DomainError::assignment(format!("Could not release speaker {}: {}", key, e.message)))
                    }
                },
                {
                    let key = old_speaker_key.clone();
                    move || async move {
                        match released_window {
                            Some(w) => edit_if_present(speakers.as_ref(), &key, |s: &mut Speaker| {
                                s.assign(session_id, w).map(|()| true)
                            })
                            .await
                            .map(drop),
                            None => Ok(()),
                        }
                    }
                },
            )
            .step(
                "assign_speaker",
                {
                    let key = new_speaker_key.clone();
                    move || async move {
                        edit_record(speakers.as_ref(), "Speaker", &key, |s: &mut Speaker| {
                            s.assign(session_id, window).map(|()| true)
                        })
                        .await
                        .map(drop)
                        .map_err(|e| DomainError::assignment(format!("Could not assign speaker {}: {}", key, e.message)))
                    }
                },
                {
                    let key = new_speaker_key.clone();
                    move || async move {
                        edit_if_present(speakers.as_ref(), &key, |s: &mut Speaker| match prior_window {
                            Some(w) => s.assign(session_id, w).map(|()| true),
                            None => Ok(s.unassign(&session_id).is_some()),
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .step_if(
                needs_registration,
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
            .step_if(
                !holding.is_empty(),
                "reschedule_attendees",
                {
                    let keys = holding.clone();
                    move || async move {
                        edit_each(attendees.as_ref(), &keys, to_new_start, to_old_start)
                            .await
                            .map_err(|e| DomainError::assignment(format!("Could not reschedule attendees: {}", e.message)))
                    }
                },
                {
                    let keys = holding.clone();
                    move || async move { revert_each(attendees.as_ref(), &keys, to_old_start).await }
                },
            )
            .run()
            .await
            .map_err(SagaFailure::into_error)?;

        tracing::info!(session_id = %session_id, moved, "Session updated");

        // 4. Notify attendees and speakers (fire-and-forget)
        let subject = format!("Session updated: {}", session.name());
        let mut notifications: Vec<_> = registered
            .iter()
            .map(|a| {
                notice(
                    a.email(),
                    a.name(),
                    subject.clone(),
                    format!(
                        "'{}' you registered for is now in {} on {}.",
                        session.name(),
                        session.room(),
                        session.window()
                    ),
                )
            })
            .collect();
        notifications.push(notice(
            new_speaker.email(),
            new_speaker.name(),
            subject,
            format!("'{}' is now in {} on {}.", session.name(), session.room(), session.window()),
        ));
        if let Some(old) = &old_speaker {
            notifications.push(notice(
                old.email(),
                old.name(),
                format!("Session reassigned: {}", previous.name()),
                format!("'{}' has been assigned to another speaker.", previous.name()),
            ));
        }
        let notifications_scheduled = self.notifier.dispatch(notifications);

        Ok(UpdateSessionResult {
            previous,
            session,
            notifications_scheduled,
        })
    }

    /// Registered attendees still on file.
    async fn registered_attendees(&self, session: &Session) -> Vec<Attendee> {
        let mut found = Vec::new();
        for attendee_id in session.registered_attendees() {
            match self.attendees.find(attendee_id.as_str()).await {
                Some(attendee) => found.push(attendee),
                None => {
                    tracing::warn!(attendee_id = %attendee_id, session_id = %session.id(), "Registered attendee missing from store");
                }
            }
        }
        found
    }
}

/// Keys of the attendees whose schedule holds the session, after checking
/// each can take it at `new_start`.
fn holders_free_at(
    registered: &[Attendee],
    session_id: SessionId,
    new_start: NaiveDateTime,
) -> Result<Vec<String>, DomainError> {
    let mut keys = Vec::new();
    for attendee in registered.iter().filter(|a| a.is_attending(&session_id)) {
        let mut moved = attendee.clone();
        moved.add_session(session_id, new_start)?;
        keys.push(attendee.id().as_str().to_string());
    }
    Ok(keys)
}
