//! Notification ports - best-effort e-mail delivery after a workflow.
//!
//! Two seams:
//! - `EmailSender` is the mail boundary, one call per message.
//! - `NotificationDispatcher` schedules delivery tasks and returns
//!   immediately; it never reports delivery outcome to the caller.

use async_trait::async_trait;

/// Errors a mail boundary can report for a single send.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeliveryError {
    #[error("Recipient address rejected: {0}")]
    InvalidRecipient(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// One e-mail to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to_address: String,
    pub display_name: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        to_address: impl Into<String>,
        display_name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to_address: to_address.into(),
            display_name: display_name.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Port for the mail layer.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver one message.
    async fn send_email(
        &self,
        to_address: &str,
        display_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), DeliveryError>;
}

/// Port for fire-and-forget notification scheduling.
///
/// Implementations must:
/// - schedule one independent task per notification
/// - never block on delivery and never fail the caller
pub trait NotificationDispatcher: Send + Sync {
    /// Schedule delivery of every notification; returns how many were scheduled.
    fn dispatch(&self, notifications: Vec<Notification>) -> usize;
}
