//! DeleteSessionHandler - Command handler for cancelling a session.

use std::sync::Arc;

use crate::application::handlers::support::{
    edit_each, edit_if_present, edit_record, notice, require, revert_each,
};
use crate::application::saga::{Saga, SagaFailure, WorkflowLock};
use crate::domain::conference::Conference;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::participant::{Attendee, Speaker};
use crate::domain::session::Session;
use crate::ports::{KeyedStore, NotificationDispatcher};

/// Command to delete a session.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteSessionResult {
    pub session: Session,
    pub notifications_scheduled: usize,
}

/// Handler for deleting sessions.
///
/// Steps: delete the session, unassign it from the speaker, remove it
/// from the conference, release it from attendee schedules. Links that
/// already dangle (a speaker or conference no longer stored, or no longer
/// holding the session) are skipped. Every registered attendee still on
/// file is told about the cancellation.
pub struct DeleteSessionHandler {
    sessions: Arc<dyn KeyedStore<Session>>,
    conferences: Arc<dyn KeyedStore<Conference>>,
    speakers: Arc<dyn KeyedStore<Speaker>>,
    attendees: Arc<dyn KeyedStore<Attendee>>,
    notifier: Arc<dyn NotificationDispatcher>,
    lock: WorkflowLock,
}

impl DeleteSessionHandler {
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

    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<DeleteSessionResult, DomainError> {
        let _guard = self.lock.acquire().await;

        // 1. Load the session and find which links still hold it
        let session_key = cmd.session_id.to_string();
        let session = require(self.sessions.as_ref(), "Session", &session_key).await?;
        let session_id = cmd.session_id;
        let starts_at = session.starts_at();

        let speaker = self.speakers.find(session.speaker_id().as_str()).await;
        let speaker_window = speaker
            .as_ref()
            .and_then(|s| s.assignment_for(&session_id))
            .map(|entry| entry.window());
        let speaker_key = session.speaker_id().as_str().to_string();

        let conference_key = session.conference_id().to_string();
        let in_conference = self
            .conferences
            .find(&conference_key)
            .await
            .is_some_and(|c| c.has_session(&session_id));

        let mut registered = Vec::new();
        for attendee_id in session.registered_attendees() {
            match self.attendees.find(attendee_id.as_str()).await {
                Some(attendee) => registered.push(attendee),
                None => {
                    tracing::warn!(attendee_id = %attendee_id, session_id = %session_id, "Registered attendee missing from store");
                }
            }
        }
        let holding: Vec<String> = registered
            .iter()
            .filter(|a| a.is_attending(&session_id))
            .map(|a| a.id().as_str().to_string())
            .collect();

        // 2. Run the workflow
        let sessions = &self.sessions;
        let speakers = &self.speakers;
        let conferences = &self.conferences;
        let attendees = &self.attendees;
        let release = move |a: &mut Attendee| Ok::<_, DomainError>(a.remove_session(&session_id).is_some());
        let rebook = move |a: &mut Attendee| a.add_session(session_id, starts_at).map(|()| true);

        Saga::new("delete_session")
            .step(
                "delete_session",
                {
                    let key = session_key.clone();
                    move || async move { sessions.delete(&key).await.map_err(DomainError::from) }
                },
                {
                    let (key, session) = (session_key.clone(), session.clone());
                    move || async move { sessions.save(&key, &session).await.map_err(DomainError::from) }
                },
            )
            .step_if(
                speaker_window.is_some(),
                "unassign_from_speaker",
                {
                    let key = speaker_key.clone();
                    move || async move {
                        edit_record(speakers.as_ref(), "Speaker", &key, |s: &mut Speaker| {
                            Ok(s.unassign(&session_id).is_some())
                        })
                        .await
                        .map(drop)
                        .map_err(|e| DomainError::assignment(format!("Could not unassign speaker {}: {}", key, e.message)))
                    }
                },
                {
                    let key = speaker_key.clone();
                    move || async move {
                        match speaker_window {
                            Some(window) => edit_if_present(speakers.as_ref(), &key, |s: &mut Speaker| {
                                s.assign(session_id, window).map(|()| true)
                            })
                            .await
                            .map(drop),
                            None => Ok(()),
                        }
                    }
                },
            )
            .step_if(
                in_conference,
                "remove_from_conference",
                {
                    let key = conference_key.clone();
                    move || async move {
                        edit_record(conferences.as_ref(), "Conference", &key, |c: &mut Conference| {
                            Ok(c.remove_session(&session_id))
                        })
                        .await
                        .map(drop)
                    }
                },
                {
                    let key = conference_key.clone();
                    move || async move {
                        edit_if_present(conferences.as_ref(), &key, |c: &mut Conference| {
                            Ok(c.add_session(session_id))
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .step_if(
                !holding.is_empty(),
                "release_attendees",
                {
                    let keys = holding.clone();
                    move || async move {
                        edit_each(attendees.as_ref(), &keys, release, rebook)
                            .await
                            .map_err(|e| DomainError::assignment(format!("Could not release attendees: {}", e.message)))
                    }
                },
                {
                    let keys = holding.clone();
                    move || async move { revert_each(attendees.as_ref(), &keys, rebook).await }
                },
            )
            .run()
            .await
            .map_err(SagaFailure::into_error)?;

        tracing::info!(session_id = %session_id, "Session deleted");

        // 3. Notify every registered attendee and the speaker (fire-and-forget)
        let subject = format!("Session cancelled: {}", session.name());
        let body = format!(
            "'{}' scheduled for {} in {} has been cancelled.",
            session.name(),
            session.window(),
            session.room()
        );
        let mut notifications: Vec<_> = registered
            .iter()
            .map(|a| notice(a.email(), a.name(), subject.clone(), body.clone()))
            .collect();
        if let Some(s) = &speaker {
            notifications.push(notice(s.email(), s.name(), subject, body));
        }
        let notifications_scheduled = self.notifier.dispatch(notifications);

        Ok(DeleteSessionResult {
            session,
            notifications_scheduled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_world::{date, World};
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::session::test_support::details;

    fn handler(world: &World) -> DeleteSessionHandler {
        DeleteSessionHandler::new(
            world.session_store(),
            world.conference_store(),
            world.speaker_store(),
            world.attendee_store(),
            world.notifier(),
        )
    }

    /// A session linked into every store, with one registered attendee.
    async fn scheduled(world: &World) -> (Session, Conference, UserId, UserId) {
        let conference = world
            .add_conference("RustConf", date(2025, 1, 10), date(2025, 1, 12))
            .await;
        let speaker = world.add_speaker("ada").await;
        let attendee = world.add_attendee("bob").await;

        let mut session = Session::new(
            SessionId::new(),
            *conference.id(),
            speaker.clone(),
            details("Keynote", date(2025, 1, 10), (9, 0), (10, 0)),
        )
        .unwrap();
        session.register_attendee(attendee.clone());
        world.sessions.seed(&session.id().to_string(), session.clone()).await;

        let mut s = world.speaker(&speaker).await;
        s.assign(*session.id(), session.window()).unwrap();
        world.speakers.seed("ada", s).await;

        let mut a = world.attendee(&attendee).await;
        a.add_session(*session.id(), session.starts_at()).unwrap();
        world.attendees.seed("bob", a).await;

        let mut c = conference.clone();
        c.add_session(*session.id());
        world.conferences.seed(&c.id().to_string(), c.clone()).await;

        (session, c, speaker, attendee)
    }

    #[tokio::test]
    async fn removes_session_from_every_store() {
        let world = World::new();
        let (session, conference, speaker, attendee) = scheduled(&world).await;

        let result = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap();

        assert!(world.session(&session).await.is_none());
        assert!(world.speaker(&speaker).await.assignment_for(session.id()).is_none());
        assert!(!world.conference(&conference).await.has_session(session.id()));
        assert!(!world.attendee(&attendee).await.is_attending(session.id()));
        assert_eq!(result.notifications_scheduled, 2);
    }

    #[tokio::test]
    async fn conference_failure_restores_session_and_speaker() {
        let world = World::new();
        let (session, conference, speaker, attendee) = scheduled(&world).await;
        world.conferences.fail_saves(true);

        let err = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PersistenceFailed);
        assert_eq!(world.session(&session).await, Some(session.clone()));
        assert!(world.speaker(&speaker).await.assignment_for(session.id()).is_some());
        assert!(world.conference(&conference).await.has_session(session.id()));
        assert!(world.attendee(&attendee).await.is_attending(session.id()));
        assert_eq!(world.dispatcher.scheduled_count(), 0);
    }

    #[tokio::test]
    async fn attendee_failure_unwinds_all_earlier_steps() {
        let world = World::new();
        let (session, conference, speaker, _) = scheduled(&world).await;
        world.attendees.fail_saves(true);

        let err = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AssignmentFailed);
        assert!(world.session(&session).await.is_some());
        assert!(world.speaker(&speaker).await.assignment_for(session.id()).is_some());
        assert!(world.conference(&conference).await.has_session(session.id()));
    }

    #[tokio::test]
    async fn failed_compensation_still_reports_original_error() {
        let world = World::new();
        let (session, _, _, _) = scheduled(&world).await;
        world.conferences.fail_saves(true);
        // restoring the deleted session will fail too
        world.sessions.fail_saves(true);

        let err = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PersistenceFailed);
        assert_eq!(
            err.details.get("failed_step").map(String::as_str),
            Some("remove_from_conference")
        );
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let world = World::new();
        let err = handler(&world)
            .handle(DeleteSessionCommand { session_id: SessionId::new() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn registered_attendee_without_schedule_entry_is_still_notified() {
        let world = World::new();
        let (session, _, _, attendee) = scheduled(&world).await;
        let carol = world.add_attendee("carol").await;
        let mut stored = world.session(&session).await.unwrap();
        stored.register_attendee(carol.clone());
        world.sessions.seed(&session.id().to_string(), stored).await;
        let carol_before = world.attendee(&carol).await;

        let result = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap();

        assert_eq!(result.notifications_scheduled, 3);
        let recipients = world.dispatcher.recipients();
        assert!(recipients.contains(&"carol@example.com".to_string()));
        assert!(recipients.contains(&"bob@example.com".to_string()));
        assert_eq!(world.attendee(&carol).await, carol_before);
        assert!(!world.attendee(&attendee).await.is_attending(session.id()));
    }

    #[tokio::test]
    async fn failing_attendee_release_restores_other_links() {
        let world = World::new();
        let (session, conference, speaker, bob) = scheduled(&world).await;
        let carol = world.add_attendee("carol").await;
        let mut a = world.attendee(&carol).await;
        a.add_session(*session.id(), session.starts_at()).unwrap();
        world.attendees.seed("carol", a).await;
        let mut stored = world.session(&session).await.unwrap();
        stored.register_attendee(carol.clone());
        world.sessions.seed(&session.id().to_string(), stored).await;
        world.attendees.fail_saves_after(1);

        let err = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AssignmentFailed);
        assert!(world.session(&session).await.is_some());
        assert!(world.speaker(&speaker).await.assignment_for(session.id()).is_some());
        assert!(world.conference(&conference).await.has_session(session.id()));
        assert!(world.attendee(&carol).await.is_attending(session.id()));
        // bob's release landed and re-booking him hit the same failing store
        assert!(!world.attendee(&bob).await.is_attending(session.id()));
        assert_eq!(world.dispatcher.scheduled_count(), 0);
    }

    #[tokio::test]
    async fn dangling_speaker_is_skipped() {
        let world = World::new();
        let (session, _, _, _) = scheduled(&world).await;
        world.speakers.delete("ada").await.unwrap();

        let result = handler(&world)
            .handle(DeleteSessionCommand { session_id: *session.id() })
            .await
            .unwrap();

        assert!(world.session(&session).await.is_none());
        assert_eq!(result.notifications_scheduled, 1);
    }
}
