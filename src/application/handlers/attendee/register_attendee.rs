//! RegisterAttendeeHandler - Command handler for session registration.
//!
//! Steps, each undone in reverse if a later one fails:
//! 1. add the attendee to the session's registrations
//! 2. add the session to the attendee's schedule
//! 3. add the attendee to the conference, unless already there

use std::sync::Arc;

use crate::application::handlers::support::{edit_if_present, edit_record, notice, require};
use crate::application::saga::{Saga, SagaFailure, WorkflowLock};
use crate::domain::conference::Conference;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::participant::Attendee;
use crate::domain::scheduling::ConflictValidator;
use crate::domain::session::Session;
use crate::ports::{KeyedStore, NotificationDispatcher};

/// Command to register an attendee for a session.
#[derive(Debug, Clone)]
pub struct RegisterAttendeeCommand {
    pub session_id: SessionId,
    pub attendee_id: UserId,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterAttendeeResult {
    pub session: Session,
    pub notifications_scheduled: usize,
}

/// Handler for registering attendees.
pub struct RegisterAttendeeHandler {
    sessions: Arc<dyn KeyedStore<Session>>,
    conferences: Arc<dyn KeyedStore<Conference>>,
    attendees: Arc<dyn KeyedStore<Attendee>>,
    notifier: Arc<dyn NotificationDispatcher>,
    lock: WorkflowLock,
}

impl RegisterAttendeeHandler {
    pub fn new(
        sessions: Arc<dyn KeyedStore<Session>>,
        conferences: Arc<dyn KeyedStore<Conference>>,
        attendees: Arc<dyn KeyedStore<Attendee>>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            sessions,
            conferences,
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

    pub async fn handle(&self, cmd: RegisterAttendeeCommand) -> Result<RegisterAttendeeResult, DomainError> {
        let _guard = self.lock.acquire().await;
        let session_key = cmd.session_id.to_string();
        let session = require(self.sessions.as_ref(), "Session", &session_key).await?;
        let conference_key = session.conference_id().to_string();
        let conference = require(self.conferences.as_ref(), "Conference", &conference_key).await?;
        let attendee = require(self.attendees.as_ref(), "Attendee", cmd.attendee_id.as_str()).await?;

        if session.is_registered(&cmd.attendee_id) {
            return Err(DomainError::validation(
                "attendee_id",
                format!("{} is already registered for '{}'", cmd.attendee_id, session.name()),
            ));
        }
        self.check_attendee_free(&attendee, &session).await?;

        let session_id = *session.id();
        let starts_at = session.starts_at();
        let attendee_id = cmd.attendee_id;
        let attendee_key = attendee_id.as_str().to_string();
        let joins_conference = !conference.has_attendee(&attendee_id);

        let sessions = &self.sessions;
        let conferences = &self.conferences;
        let attendees = &self.attendees;

        Saga::new("register_attendee")
            .step(
                "add_to_session",
                {
                    let (key, id) = (session_key.clone(), attendee_id.clone());
                    move || async move {
                        edit_record(sessions.as_ref(), "Session", &key, |s: &mut Session| {
                            Ok(s.register_attendee(id))
                        })
                        .await
                        .map(drop)
                    }
                },
                {
                    let (key, id) = (session_key.clone(), attendee_id.clone());
                    move || async move {
                        edit_if_present(sessions.as_ref(), &key, |s: &mut Session| Ok(s.unregister_attendee(&id)))
                            .await
                            .map(drop)
                    }
                },
            )
            .step(
                "add_to_attendee_schedule",
                {
                    let key = attendee_key.clone();
                    move || async move {
                        edit_record(attendees.as_ref(), "Attendee", &key, |a: &mut Attendee| {
                            a.add_session(session_id, starts_at).map(|()| true)
                        })
                        .await
                        .map(drop)
                        .map_err(|e| {
                            DomainError::assignment(format!("Could not update schedule of {}: {}", key, e.message))
                        })
                    }
                },
                {
                    let key = attendee_key.clone();
                    move || async move {
                        edit_if_present(attendees.as_ref(), &key, |a: &mut Attendee| {
                            Ok(a.remove_session(&session_id).is_some())
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .step_if(
                joins_conference,
                "add_to_conference",
                {
                    let (key, id) = (conference_key.clone(), attendee_id.clone());
                    move || async move {
                        edit_record(conferences.as_ref(), "Conference", &key, |c: &mut Conference| {
                            Ok(c.add_attendee(id))
                        })
                        .await
                        .map(drop)
                    }
                },
                {
                    let (key, id) = (conference_key.clone(), attendee_id.clone());
                    move || async move {
                        edit_if_present(conferences.as_ref(), &key, |c: &mut Conference| Ok(c.remove_attendee(&id)))
                            .await
                            .map(drop)
                    }
                },
            )
            .run()
            .await
            .map_err(SagaFailure::into_error)?;

        let mut registered = session.clone();
        registered.register_attendee(attendee_id.clone());

        tracing::info!(session_id = %session_id, attendee_id = %attendee_id, "Attendee registered");

        let notifications_scheduled = self.notifier.dispatch(vec![notice(
            attendee.email(),
            attendee.name(),
            format!("Registered: {}", session.name()),
            format!(
                "You are registered for '{}' in {} on {}.",
                session.name(),
                session.room(),
                session.window()
            ),
        )]);

        Ok(RegisterAttendeeResult {
            session: registered,
            notifications_scheduled,
        })
    }

    /// Reject the registration if it overlaps a session the attendee
    /// already holds.
    async fn check_attendee_free(&self, attendee: &Attendee, session: &Session) -> Result<(), DomainError> {
        let mut booked = Vec::new();
        for (_, id) in attendee.schedule() {
            if let Some(other) = self.sessions.find(&id.to_string()).await {
                booked.push(other);
            }
        }
        if !ConflictValidator::time_slot_free(&session.window(), booked.iter()) {
            return Err(DomainError::validation(
                "session_id",
                format!(
                    "{} already attends a session overlapping {}",
                    attendee.id(),
                    session.window()
                ),
            ));
        }
        Ok(())
    }
}
