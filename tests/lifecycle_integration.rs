//! Integration tests for the session lifecycle workflows.
//!
//! These tests drive the public handlers against file-backed stores in a
//! temporary directory:
//! 1. A conference and its sessions are created, revised and cancelled
//! 2. Every store is reopened from disk to check what was persisted
//! 3. A broken backing file makes a late step fail, and earlier steps
//!    are undone on disk as well as in memory

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;

use conference_sessions::adapters::RecordingDispatcher;
use conference_sessions::app::{ConferenceApp, Stores};
use conference_sessions::application::{
    CreateConferenceCommand, CreateSessionCommand, DeleteSessionCommand, GetSpeakerScheduleQuery,
    ListConferenceSessionsQuery, RecordAttendanceCommand, RegisterAttendeeCommand,
    SubmitFeedbackCommand, UpdateSessionCommand,
};
use conference_sessions::config::AppConfig;
use conference_sessions::domain::conference::Conference;
use conference_sessions::domain::feedback::FeedbackKind;
use conference_sessions::domain::foundation::{ErrorCode, UserId};
use conference_sessions::domain::participant::{Attendee, Organizer, Speaker};
use conference_sessions::domain::session::SessionDetails;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn config_for(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.to_path_buf();
    config.storage.base_backoff_ms = 1;
    config
}

async fn open(dir: &Path) -> (ConferenceApp, Arc<RecordingDispatcher>) {
    let stores = Stores::open(&config_for(dir)).await.unwrap();
    let dispatcher = Arc::new(RecordingDispatcher::new());
    (ConferenceApp::new(stores, dispatcher.clone()), dispatcher)
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn details(name: &str, d: u32, start: u32, end: u32) -> SessionDetails {
    SessionDetails {
        name: name.to_string(),
        description: format!("About {}", name),
        room: "Hall A".to_string(),
        date: day(d),
        start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
    }
}

async fn seed_people(app: &ConferenceApp) {
    let s = &app.stores;
    s.organizers
        .save("org", &Organizer::new(user("org"), "Olivia", "olivia@example.com"))
        .await
        .unwrap();
    s.speakers
        .save("ada", &Speaker::new(user("ada"), "Ada", "ada@example.com"))
        .await
        .unwrap();
    s.attendees
        .save("bob", &Attendee::new(user("bob"), "Bob", "bob@example.com"))
        .await
        .unwrap();
}

async fn create_conference(app: &ConferenceApp) -> Conference {
    app.create_conference
        .handle(CreateConferenceCommand {
            organizer_id: user("org"),
            name: "RustConf".to_string(),
            description: "Annual Rust gathering".to_string(),
            start_date: day(10),
            end_date: day(12),
        })
        .await
        .unwrap()
        .conference
}

/// Turn the backing file into a directory so every write to it fails.
fn break_store(dir: &Path, aggregate: &str) {
    let path = dir.join(format!("{}.json", aggregate));
    let _ = std::fs::remove_file(&path);
    std::fs::create_dir_all(path.join("blocker")).unwrap();
}

// =============================================================================
// Full lifecycle
// =============================================================================

#[tokio::test]
async fn full_lifecycle_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let (app, dispatcher) = open(dir.path()).await;
    seed_people(&app).await;

    let conference = create_conference(&app).await;
    let session = app
        .create_session
        .handle(CreateSessionCommand {
            conference_id: *conference.id(),
            speaker_id: user("ada"),
            details: details("Ownership in Practice", 10, 9, 10),
        })
        .await
        .unwrap()
        .session;

    app.register_attendee
        .handle(RegisterAttendeeCommand {
            session_id: *session.id(),
            attendee_id: user("bob"),
        })
        .await
        .unwrap();

    let moved = app
        .update_session
        .handle(UpdateSessionCommand {
            session_id: *session.id(),
            speaker_id: user("ada"),
            details: details("Ownership in Practice", 11, 14, 15),
        })
        .await
        .unwrap()
        .session;

    app.record_attendance
        .handle(RecordAttendanceCommand {
            session_id: *session.id(),
            attendee_id: user("bob"),
            present: true,
        })
        .await
        .unwrap();

    app.submit_feedback
        .handle(SubmitFeedbackCommand {
            conference_id: *conference.id(),
            author_id: user("bob"),
            subject_id: session.id().to_string(),
            kind: FeedbackKind::Session,
            rating: 5,
            comment: "Clear and practical".to_string(),
        })
        .await
        .unwrap();

    // organizer, speaker on create, attendee on registration, attendee + speaker on update
    assert_eq!(dispatcher.scheduled_count(), 5);
    drop(app);

    // Reopen everything from disk
    let (app, _) = open(dir.path()).await;
    let sessions = app
        .list_sessions
        .handle(ListConferenceSessionsQuery {
            conference_id: *conference.id(),
        })
        .await
        .unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].date(), day(11));
    assert_eq!(sessions[0].attendance_of(&user("bob")), Some(true));

    let schedule = app
        .speaker_schedule
        .handle(GetSpeakerScheduleQuery { speaker_id: user("ada") })
        .await
        .unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].start, moved.starts_at());

    let bob = app.stores.attendees.find("bob").await.unwrap();
    assert!(bob.is_attending(session.id()));

    let stored = app.stores.conferences.find(&conference.id().to_string()).await.unwrap();
    assert!(stored.has_session(session.id()));
    assert!(stored.has_attendee(&user("bob")));
    assert_eq!(stored.feedback_ids().len(), 1);
    assert_eq!(app.stores.feedback.find_all().await.len(), 1);
}

#[tokio::test]
async fn cancelled_session_disappears_everywhere() {
    let dir = TempDir::new().unwrap();
    let (app, dispatcher) = open(dir.path()).await;
    seed_people(&app).await;
    let conference = create_conference(&app).await;
    let session = app
        .create_session
        .handle(CreateSessionCommand {
            conference_id: *conference.id(),
            speaker_id: user("ada"),
            details: details("Async Rust", 10, 9, 10),
        })
        .await
        .unwrap()
        .session;
    app.register_attendee
        .handle(RegisterAttendeeCommand {
            session_id: *session.id(),
            attendee_id: user("bob"),
        })
        .await
        .unwrap();
    dispatcher.clear();

    let result = app
        .delete_session
        .handle(DeleteSessionCommand { session_id: *session.id() })
        .await
        .unwrap();
    assert_eq!(result.notifications_scheduled, 2);
    drop(app);

    let (app, _) = open(dir.path()).await;
    assert!(app.stores.sessions.find_all().await.is_empty());
    assert_eq!(app.stores.speakers.find("ada").await.unwrap().schedule().count(), 0);
    assert!(!app.stores.attendees.find("bob").await.unwrap().is_attending(session.id()));
    let stored = app.stores.conferences.find(&conference.id().to_string()).await.unwrap();
    assert!(stored.session_ids().is_empty());
}

// =============================================================================
// Failure and compensation
// =============================================================================

#[tokio::test]
async fn failed_registration_step_leaves_no_trace_on_disk() {
    let dir = TempDir::new().unwrap();
    let (app, dispatcher) = open(dir.path()).await;
    seed_people(&app).await;
    let conference = create_conference(&app).await;
    dispatcher.clear();

    break_store(dir.path(), "conferences");

    let err = app
        .create_session
        .handle(CreateSessionCommand {
            conference_id: *conference.id(),
            speaker_id: user("ada"),
            details: details("Keynote", 10, 9, 10),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::PersistenceFailed);
    assert_eq!(dispatcher.scheduled_count(), 0);
    assert!(app.stores.sessions.find_all().await.is_empty());
    assert_eq!(app.stores.speakers.find("ada").await.unwrap().schedule().count(), 0);
    drop(app);

    let sessions = std::fs::read_to_string(dir.path().join("sessions.json")).unwrap();
    assert!(!sessions.contains("Keynote"));
    let speakers = std::fs::read_to_string(dir.path().join("speakers.json")).unwrap();
    assert!(!speakers.contains("session_id"));
}

#[tokio::test]
async fn validation_failures_touch_no_file() {
    let dir = TempDir::new().unwrap();
    let (app, _) = open(dir.path()).await;
    seed_people(&app).await;
    let conference = create_conference(&app).await;

    let err = app
        .create_session
        .handle(CreateSessionCommand {
            conference_id: *conference.id(),
            speaker_id: user("ada"),
            details: details("Too Early", 9, 9, 10),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert!(!dir.path().join("sessions.json").exists());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_keep_every_link_on_disk() {
    let dir = TempDir::new().unwrap();
    let (app, _) = open(dir.path()).await;
    seed_people(&app).await;
    let conference = create_conference(&app).await;
    let app = Arc::new(app);

    // two non-touching slots per conference day
    let tasks: Vec<_> = (0..6u32)
        .map(|i| {
            let app = app.clone();
            let cmd = CreateSessionCommand {
                conference_id: *conference.id(),
                speaker_id: user("ada"),
                details: details(&format!("Talk {}", i), 10 + i / 2, 9 + (i % 2) * 3, 10 + (i % 2) * 3),
            };
            tokio::spawn(async move { app.create_session.handle(cmd).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    drop(app);

    let (app, _) = open(dir.path()).await;
    assert_eq!(app.stores.sessions.find_all().await.len(), 6);
    assert_eq!(app.stores.speakers.find("ada").await.unwrap().schedule().count(), 6);
    let stored = app.stores.conferences.find(&conference.id().to_string()).await.unwrap();
    assert_eq!(stored.session_ids().len(), 6);
}
