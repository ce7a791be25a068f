//! SubmitFeedbackHandler - Command handler for attendee feedback.

use std::sync::Arc;

use crate::application::handlers::support::{edit_if_present, edit_record, require};
use crate::application::saga::{Saga, SagaFailure, WorkflowLock};
use crate::domain::conference::Conference;
use crate::domain::feedback::{Feedback, FeedbackKind};
use crate::domain::foundation::{ConferenceId, DomainError, FeedbackId, Rating, SessionId, UserId};
use crate::domain::participant::{Attendee, Speaker};
use crate::domain::session::Session;
use crate::ports::KeyedStore;

/// Command to submit feedback on a session, conference or speaker.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackCommand {
    pub conference_id: ConferenceId,
    pub author_id: UserId,
    pub subject_id: String,
    pub kind: FeedbackKind,
    pub rating: u8,
    pub comment: String,
}

/// Handler for submitting feedback.
///
/// The subject must belong to the conference: a session of it, the
/// conference itself, or a speaker presenting one of its sessions.
/// Steps: persist the feedback, then attach it to its conference.
/// No notification is sent.
pub struct SubmitFeedbackHandler {
    feedback: Arc<dyn KeyedStore<Feedback>>,
    conferences: Arc<dyn KeyedStore<Conference>>,
    sessions: Arc<dyn KeyedStore<Session>>,
    speakers: Arc<dyn KeyedStore<Speaker>>,
    attendees: Arc<dyn KeyedStore<Attendee>>,
    lock: WorkflowLock,
}

impl SubmitFeedbackHandler {
    pub fn new(
        feedback: Arc<dyn KeyedStore<Feedback>>,
        conferences: Arc<dyn KeyedStore<Conference>>,
        sessions: Arc<dyn KeyedStore<Session>>,
        speakers: Arc<dyn KeyedStore<Speaker>>,
        attendees: Arc<dyn KeyedStore<Attendee>>,
    ) -> Self {
        Self {
            feedback,
            conferences,
            sessions,
            speakers,
            attendees,
            lock: WorkflowLock::new(),
        }
    }

    /// Share `lock` with the other workflow handlers.
    pub fn with_lock(mut self, lock: WorkflowLock) -> Self {
        self.lock = lock;
        self
    }

    pub async fn handle(&self, cmd: SubmitFeedbackCommand) -> Result<Feedback, DomainError> {
        let _guard = self.lock.acquire().await;

        let rating = Rating::try_from_u8(cmd.rating)?;
        let conference_key = cmd.conference_id.to_string();
        require(self.conferences.as_ref(), "Conference", &conference_key).await?;
        require(self.attendees.as_ref(), "Attendee", cmd.author_id.as_str()).await?;
        self.require_subject(&cmd.conference_id, cmd.kind, &cmd.subject_id).await?;

        let feedback = Feedback::new(
            FeedbackId::new(),
            cmd.conference_id,
            cmd.author_id,
            cmd.subject_id,
            cmd.kind,
            rating,
            cmd.comment,
        )?;

        let feedback_key = feedback.id().to_string();
        let feedback_id = *feedback.id();
        let store = &self.feedback;
        let conferences = &self.conferences;

        Saga::new("submit_feedback")
            .step(
                "persist_feedback",
                {
                    let (key, feedback) = (feedback_key.clone(), feedback.clone());
                    move || async move { store.save(&key, &feedback).await.map_err(DomainError::from) }
                },
                {
                    let key = feedback_key.clone();
                    move || async move { store.delete(&key).await.map_err(DomainError::from) }
                },
            )
            .step(
                "attach_to_conference",
                {
                    let key = conference_key.clone();
                    move || async move {
                        edit_record(conferences.as_ref(), "Conference", &key, |c: &mut Conference| {
                            Ok(c.add_feedback(feedback_id))
                        })
                        .await
                        .map(drop)
                    }
                },
                {
                    let key = conference_key.clone();
                    move || async move {
                        edit_if_present(conferences.as_ref(), &key, |c: &mut Conference| {
                            Ok(c.remove_feedback(&feedback_id))
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .run()
            .await
            .map_err(SagaFailure::into_error)?;

        tracing::info!(
            feedback_id = %feedback_id,
            kind = %feedback.kind(),
            rating = feedback.rating().value(),
            "Feedback submitted"
        );
        Ok(feedback)
    }

    async fn require_subject(
        &self,
        conference_id: &ConferenceId,
        kind: FeedbackKind,
        subject_id: &str,
    ) -> Result<(), DomainError> {
        let outside = || {
            DomainError::validation(
                "subject_id",
                format!("{} {} does not belong to conference {}", kind, subject_id, conference_id),
            )
        };
        match kind {
            FeedbackKind::Session => {
                let id: SessionId = subject_id
                    .parse()
                    .map_err(|_| DomainError::validation("subject_id", format!("Invalid session id: {}", subject_id)))?;
                let session = require(self.sessions.as_ref(), "Session", &id.to_string()).await?;
                if session.conference_id() != conference_id {
                    return Err(outside());
                }
            }
            FeedbackKind::Conference => {
                let id: ConferenceId = subject_id
                    .parse()
                    .map_err(|_| DomainError::validation("subject_id", format!("Invalid conference id: {}", subject_id)))?;
                require(self.conferences.as_ref(), "Conference", &id.to_string()).await?;
                if &id != conference_id {
                    return Err(outside());
                }
            }
            FeedbackKind::Speaker => {
                let speaker = require(self.speakers.as_ref(), "Speaker", subject_id).await?;
                let presents_here = self
                    .sessions
                    .find_all()
                    .await
                    .iter()
                    .any(|s| s.conference_id() == conference_id && s.speaker_id() == speaker.id());
                if !presents_here {
                    return Err(outside());
                }
            }
        }
        Ok(())
    }
}
