//! Wiring - one file-backed store per aggregate and every handler over them.

use std::sync::Arc;

use crate::adapters::notification::{LoggingEmailSender, TokioNotificationDispatcher};
use crate::adapters::storage::FileKeyedStore;
use crate::application::{
    CreateConferenceHandler, CreateSessionHandler, DeleteSessionHandler, GetSpeakerScheduleHandler,
    ListConferenceSessionsHandler, RecordAttendanceHandler, RegisterAttendeeHandler,
    SubmitFeedbackHandler, UpdateSessionHandler, WorkflowLock,
};
use crate::config::AppConfig;
use crate::domain::conference::Conference;
use crate::domain::feedback::Feedback;
use crate::domain::participant::{Attendee, Organizer, Speaker};
use crate::domain::session::Session;
use crate::ports::{KeyedStore, NotificationDispatcher, StoreError};

/// The per-aggregate stores. Each aggregate type owns exactly one.
#[derive(Clone)]
pub struct Stores {
    pub sessions: Arc<dyn KeyedStore<Session>>,
    pub conferences: Arc<dyn KeyedStore<Conference>>,
    pub speakers: Arc<dyn KeyedStore<Speaker>>,
    pub attendees: Arc<dyn KeyedStore<Attendee>>,
    pub organizers: Arc<dyn KeyedStore<Organizer>>,
    pub feedback: Arc<dyn KeyedStore<Feedback>>,
}

impl Stores {
    /// Open `<data_dir>/<aggregate>.json` for every aggregate type.
    pub async fn open(config: &AppConfig) -> Result<Self, StoreError> {
        let storage = &config.storage;
        let retry = storage.retry_policy();
        Ok(Self {
            sessions: Arc::new(FileKeyedStore::<Session>::open(storage.path_for("sessions"), retry).await?),
            conferences: Arc::new(FileKeyedStore::<Conference>::open(storage.path_for("conferences"), retry).await?),
            speakers: Arc::new(FileKeyedStore::<Speaker>::open(storage.path_for("speakers"), retry).await?),
            attendees: Arc::new(FileKeyedStore::<Attendee>::open(storage.path_for("attendees"), retry).await?),
            organizers: Arc::new(FileKeyedStore::<Organizer>::open(storage.path_for("organizers"), retry).await?),
            feedback: Arc::new(FileKeyedStore::<Feedback>::open(storage.path_for("feedback"), retry).await?),
        })
    }
}

/// Every command and query handler, sharing one set of stores. Handlers
/// that write share one [`WorkflowLock`], so workflows never interleave.
pub struct ConferenceApp {
    pub stores: Stores,
    pub create_conference: CreateConferenceHandler,
    pub create_session: CreateSessionHandler,
    pub update_session: UpdateSessionHandler,
    pub delete_session: DeleteSessionHandler,
    pub register_attendee: RegisterAttendeeHandler,
    pub record_attendance: RecordAttendanceHandler,
    pub submit_feedback: SubmitFeedbackHandler,
    pub list_sessions: ListConferenceSessionsHandler,
    pub speaker_schedule: GetSpeakerScheduleHandler,
}

impl ConferenceApp {
    /// Open file stores from `config` and deliver mail through the log.
    pub async fn open(config: &AppConfig) -> Result<Self, StoreError> {
        let stores = Stores::open(config).await?;
        let sender = Arc::new(LoggingEmailSender::from_config(&config.notification));
        let notifier = Arc::new(TokioNotificationDispatcher::with_policy(
            sender,
            config.notification.delivery_policy(),
        ));
        Ok(Self::new(stores, notifier))
    }

    pub fn new(stores: Stores, notifier: Arc<dyn NotificationDispatcher>) -> Self {
        let s = &stores;
        let lock = WorkflowLock::new();
        Self {
            create_conference: CreateConferenceHandler::new(
                s.conferences.clone(),
                s.organizers.clone(),
                notifier.clone(),
            )
            .with_lock(lock.clone()),
            create_session: CreateSessionHandler::new(
                s.sessions.clone(),
                s.conferences.clone(),
                s.speakers.clone(),
                notifier.clone(),
            )
            .with_lock(lock.clone()),
            update_session: UpdateSessionHandler::new(
                s.sessions.clone(),
                s.conferences.clone(),
                s.speakers.clone(),
                s.attendees.clone(),
                notifier.clone(),
            )
            .with_lock(lock.clone()),
            delete_session: DeleteSessionHandler::new(
                s.sessions.clone(),
                s.conferences.clone(),
                s.speakers.clone(),
                s.attendees.clone(),
                notifier.clone(),
            )
            .with_lock(lock.clone()),
            register_attendee: RegisterAttendeeHandler::new(
                s.sessions.clone(),
                s.conferences.clone(),
                s.attendees.clone(),
                notifier,
            )
            .with_lock(lock.clone()),
            record_attendance: RecordAttendanceHandler::new(s.sessions.clone()).with_lock(lock.clone()),
            submit_feedback: SubmitFeedbackHandler::new(
                s.feedback.clone(),
                s.conferences.clone(),
                s.sessions.clone(),
                s.speakers.clone(),
                s.attendees.clone(),
            )
            .with_lock(lock),
            list_sessions: ListConferenceSessionsHandler::new(s.sessions.clone(), s.conferences.clone()),
            speaker_schedule: GetSpeakerScheduleHandler::new(s.speakers.clone()),
            stores,
        }
    }
}
