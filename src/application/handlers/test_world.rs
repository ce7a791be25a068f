//! In-memory stores and a recording dispatcher wired together for handler tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapters::notification::RecordingDispatcher;
use crate::adapters::storage::InMemoryKeyedStore;
use crate::domain::conference::Conference;
use crate::domain::feedback::Feedback;
use crate::domain::foundation::{ConferenceId, UserId};
use crate::domain::participant::{Attendee, Organizer, Speaker};
use crate::domain::session::Session;
use crate::ports::{KeyedStore, NotificationDispatcher};

pub(crate) struct World {
    pub sessions: InMemoryKeyedStore<Session>,
    pub conferences: InMemoryKeyedStore<Conference>,
    pub speakers: InMemoryKeyedStore<Speaker>,
    pub attendees: InMemoryKeyedStore<Attendee>,
    pub organizers: InMemoryKeyedStore<Organizer>,
    pub feedback: InMemoryKeyedStore<Feedback>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl World {
    pub fn new() -> Self {
        Self {
            sessions: InMemoryKeyedStore::new(),
            conferences: InMemoryKeyedStore::new(),
            speakers: InMemoryKeyedStore::new(),
            attendees: InMemoryKeyedStore::new(),
            organizers: InMemoryKeyedStore::new(),
            feedback: InMemoryKeyedStore::new(),
            dispatcher: Arc::new(RecordingDispatcher::new()),
        }
    }

    pub fn session_store(&self) -> Arc<dyn KeyedStore<Session>> {
        Arc::new(self.sessions.clone())
    }

    pub fn conference_store(&self) -> Arc<dyn KeyedStore<Conference>> {
        Arc::new(self.conferences.clone())
    }

    pub fn speaker_store(&self) -> Arc<dyn KeyedStore<Speaker>> {
        Arc::new(self.speakers.clone())
    }

    pub fn attendee_store(&self) -> Arc<dyn KeyedStore<Attendee>> {
        Arc::new(self.attendees.clone())
    }

    pub fn organizer_store(&self) -> Arc<dyn KeyedStore<Organizer>> {
        Arc::new(self.organizers.clone())
    }

    pub fn feedback_store(&self) -> Arc<dyn KeyedStore<Feedback>> {
        Arc::new(self.feedback.clone())
    }

    pub fn notifier(&self) -> Arc<dyn NotificationDispatcher> {
        self.dispatcher.clone()
    }

    pub async fn add_organizer(&self, id: &str) -> UserId {
        let organizer = Organizer::new(user(id), id, format!("{}@example.com", id));
        self.organizers.seed(id, organizer).await;
        user(id)
    }

    pub async fn add_speaker(&self, id: &str) -> UserId {
        let speaker = Speaker::new(user(id), id, format!("{}@example.com", id));
        self.speakers.seed(id, speaker).await;
        user(id)
    }

    pub async fn add_attendee(&self, id: &str) -> UserId {
        let attendee = Attendee::new(user(id), id, format!("{}@example.com", id));
        self.attendees.seed(id, attendee).await;
        user(id)
    }

    /// Seed a conference owned by organizer `org`.
    pub async fn add_conference(&self, name: &str, start: NaiveDate, end: NaiveDate) -> Conference {
        let organizer = self.add_organizer("org").await;
        let conference = Conference::new(
            ConferenceId::new(),
            organizer,
            name.to_string(),
            String::new(),
            start,
            end,
        )
        .unwrap();
        self.conferences.seed(&conference.id().to_string(), conference.clone()).await;
        conference
    }

    pub async fn session(&self, session: &Session) -> Option<Session> {
        self.sessions.find(&session.id().to_string()).await
    }

    pub async fn conference(&self, conference: &Conference) -> Conference {
        self.conferences.find(&conference.id().to_string()).await.unwrap()
    }

    pub async fn speaker(&self, id: &UserId) -> Speaker {
        self.speakers.find(id.as_str()).await.unwrap()
    }

    pub async fn attendee(&self, id: &UserId) -> Attendee {
        self.attendees.find(id.as_str()).await.unwrap()
    }
}

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
