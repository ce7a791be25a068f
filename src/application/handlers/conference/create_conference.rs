//! CreateConferenceHandler - Command handler for creating conferences.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::handlers::support::{edit_if_present, edit_record, notice, require};
use crate::application::saga::{Saga, SagaFailure, WorkflowLock};
use crate::domain::conference::Conference;
use crate::domain::foundation::{ConferenceId, DomainError, UserId};
use crate::domain::participant::Organizer;
use crate::domain::scheduling::ConflictValidator;
use crate::ports::{KeyedStore, NotificationDispatcher};

/// Command to create a new conference.
#[derive(Debug, Clone)]
pub struct CreateConferenceCommand {
    pub organizer_id: UserId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Result of successful conference creation.
#[derive(Debug, Clone)]
pub struct CreateConferenceResult {
    pub conference: Conference,
    pub notifications_scheduled: usize,
}

/// Handler for creating conferences.
///
/// Names are unique across all conferences and no two conferences may
/// share a day.
pub struct CreateConferenceHandler {
    conferences: Arc<dyn KeyedStore<Conference>>,
    organizers: Arc<dyn KeyedStore<Organizer>>,
    notifier: Arc<dyn NotificationDispatcher>,
    lock: WorkflowLock,
}

impl CreateConferenceHandler {
    pub fn new(
        conferences: Arc<dyn KeyedStore<Conference>>,
        organizers: Arc<dyn KeyedStore<Organizer>>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            conferences,
            organizers,
            notifier,
            lock: WorkflowLock::new(),
        }
    }

    /// Share `lock` with the other workflow handlers.
    pub fn with_lock(mut self, lock: WorkflowLock) -> Self {
        self.lock = lock;
        self
    }

    pub async fn handle(&self, cmd: CreateConferenceCommand) -> Result<CreateConferenceResult, DomainError> {
        let _guard = self.lock.acquire().await;
        let organizer = require(self.organizers.as_ref(), "Organizer", cmd.organizer_id.as_str()).await?;

        let conference = Conference::new(
            ConferenceId::new(),
            cmd.organizer_id,
            cmd.name,
            cmd.description,
            cmd.start_date,
            cmd.end_date,
        )?;
        let existing = self.conferences.find_all().await;
        ConflictValidator::check_conference(&conference, &existing)?;

        let conference_key = conference.id().to_string();
        let organizer_key = organizer.id().as_str().to_string();
        let conference_id = *conference.id();
        let conferences = &self.conferences;
        let organizers = &self.organizers;

        Saga::new("create_conference")
            .step(
                "persist_conference",
                {
                    let (key, conference) = (conference_key.clone(), conference.clone());
                    move || async move { conferences.save(&key, &conference).await.map_err(DomainError::from) }
                },
                {
                    let key = conference_key.clone();
                    move || async move { conferences.delete(&key).await.map_err(DomainError::from) }
                },
            )
            .step(
                "attach_to_organizer",
                {
                    let key = organizer_key.clone();
                    move || async move {
                        edit_record(organizers.as_ref(), "Organizer", &key, |o: &mut Organizer| {
                            Ok(o.add_conference(conference_id))
                        })
                        .await
                        .map(drop)
                        .map_err(|e| {
                            DomainError::assignment(format!(
                                "Could not attach conference to organizer {}: {}",
                                key, e.message
                            ))
                        })
                    }
                },
                {
                    let key = organizer_key.clone();
                    move || async move {
                        edit_if_present(organizers.as_ref(), &key, |o: &mut Organizer| {
                            Ok(o.remove_conference(&conference_id))
                        })
                        .await
                        .map(drop)
                    }
                },
            )
            .run()
            .await
            .map_err(SagaFailure::into_error)?;

        tracing::info!(conference_id = %conference_id, name = %conference.name(), "Conference created");

        let notifications_scheduled = self.notifier.dispatch(vec![notice(
            organizer.email(),
            organizer.name(),
            format!("Conference created: {}", conference.name()),
            format!("'{}' runs {}.", conference.name(), conference.period()),
        )]);

        Ok(CreateConferenceResult {
            conference,
            notifications_scheduled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_world::{date, user, World};
    use crate::domain::foundation::ErrorCode;

    fn handler(world: &World) -> CreateConferenceHandler {
        CreateConferenceHandler::new(world.conference_store(), world.organizer_store(), world.notifier())
    }

    fn command(name: &str, start: NaiveDate, end: NaiveDate) -> CreateConferenceCommand {
        CreateConferenceCommand {
            organizer_id: user("org"),
            name: name.to_string(),
            description: "Annual gathering".to_string(),
            start_date: start,
            end_date: end,
        }
    }

    #[tokio::test]
    async fn creates_and_attaches_to_organizer() {
        let world = World::new();
        let org = world.add_organizer("org").await;

        let result = handler(&world)
            .handle(command("RustConf", date(2025, 1, 10), date(2025, 1, 12)))
            .await
            .unwrap();

        assert_eq!(world.conference(&result.conference).await, result.conference);
        let organizer = world.organizers.find(org.as_str()).await.unwrap();
        assert!(organizer.manages(result.conference.id()));
        assert_eq!(world.dispatcher.recipients(), vec!["org@example.com"]);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_case_insensitively() {
        let world = World::new();
        world.add_organizer("org").await;
        let h = handler(&world);
        h.handle(command("RustConf", date(2025, 1, 10), date(2025, 1, 12)))
            .await
            .unwrap();

        let err = h
            .handle(command("rustconf", date(2025, 3, 1), date(2025, 3, 2)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn touching_periods_overlap() {
        let world = World::new();
        world.add_organizer("org").await;
        let h = handler(&world);
        h.handle(command("RustConf", date(2025, 1, 10), date(2025, 1, 12)))
            .await
            .unwrap();

        let err = h
            .handle(command("GoConf", date(2025, 1, 12), date(2025, 1, 14)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field").map(String::as_str), Some("start_date"));
    }

    #[tokio::test]
    async fn inverted_dates_are_rejected() {
        let world = World::new();
        world.add_organizer("org").await;

        let err = handler(&world)
            .handle(command("RustConf", date(2025, 1, 12), date(2025, 1, 10)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn unknown_organizer_is_not_found() {
        let world = World::new();

        let err = handler(&world)
            .handle(command("RustConf", date(2025, 1, 10), date(2025, 1, 12)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_all_attach_to_the_organizer() {
        let world = World::new();
        let org = world.add_organizer("org").await;
        let h = Arc::new(handler(&world));

        let tasks: Vec<_> = (1..=4u32)
            .map(|month| {
                let h = h.clone();
                let cmd = command(&format!("Conf {}", month), date(2025, month, 1), date(2025, month, 2));
                tokio::spawn(async move { h.handle(cmd).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let organizer = world.organizers.find(org.as_str()).await.unwrap();
        assert_eq!(organizer.conference_ids().len(), 4);
        assert_eq!(world.conferences.len().await, 4);
    }

    #[tokio::test]
    async fn organizer_failure_removes_conference() {
        let world = World::new();
        world.add_organizer("org").await;
        world.organizers.fail_saves(true);

        let err = handler(&world)
            .handle(command("RustConf", date(2025, 1, 10), date(2025, 1, 12)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AssignmentFailed);
        assert!(world.conferences.is_empty().await);
        assert_eq!(world.dispatcher.scheduled_count(), 0);
    }
}
