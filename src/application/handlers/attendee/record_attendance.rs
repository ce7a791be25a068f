//! RecordAttendanceHandler - Command handler for marking attendance.

use std::sync::Arc;

use crate::application::handlers::support::require;
use crate::application::saga::WorkflowLock;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::session::Session;
use crate::ports::KeyedStore;

/// Command to mark a registered attendee present or absent.
#[derive(Debug, Clone)]
pub struct RecordAttendanceCommand {
    pub session_id: SessionId,
    pub attendee_id: UserId,
    pub present: bool,
}

/// Handler for recording attendance. Touches only the session store, but
/// still waits for workflows that rewrite sessions.
pub struct RecordAttendanceHandler {
    sessions: Arc<dyn KeyedStore<Session>>,
    lock: WorkflowLock,
}

impl RecordAttendanceHandler {
    pub fn new(sessions: Arc<dyn KeyedStore<Session>>) -> Self {
        Self {
            sessions,
            lock: WorkflowLock::new(),
        }
    }

    /// Share `lock` with the other workflow handlers.
    pub fn with_lock(mut self, lock: WorkflowLock) -> Self {
        self.lock = lock;
        self
    }

    pub async fn handle(&self, cmd: RecordAttendanceCommand) -> Result<Session, DomainError> {
        let _guard = self.lock.acquire().await;
        let key = cmd.session_id.to_string();
        let mut session = require(self.sessions.as_ref(), "Session", &key).await?;

        session.mark_attendance(&cmd.attendee_id, cmd.present)?;
        self.sessions.save(&key, &session).await?;

        tracing::debug!(
            session_id = %cmd.session_id,
            attendee_id = %cmd.attendee_id,
            present = cmd.present,
            "Attendance recorded"
        );
        Ok(session)
    }
}
