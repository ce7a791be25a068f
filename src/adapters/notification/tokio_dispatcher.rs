//! TokioNotificationDispatcher - fire-and-forget e-mail delivery.
//!
//! Spawns one task per notification. Each task retries its own send a
//! fixed number of times, then logs and drops the message. Nothing is
//! awaited by the caller and no outcome flows back into the workflow.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_attempts` | 3 | Sends tried per notification |
//! | `retry_delay` | 500ms | Pause between attempts |

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::ports::{EmailSender, Notification, NotificationDispatcher};

/// Per-notification delivery budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Dispatcher that delivers on the tokio runtime.
pub struct TokioNotificationDispatcher {
    sender: Arc<dyn EmailSender>,
    policy: DeliveryPolicy,
}

impl TokioNotificationDispatcher {
    /// Create a dispatcher with the default delivery policy.
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self::with_policy(sender, DeliveryPolicy::default())
    }

    pub fn with_policy(sender: Arc<dyn EmailSender>, policy: DeliveryPolicy) -> Self {
        Self { sender, policy }
    }

    async fn deliver(sender: Arc<dyn EmailSender>, policy: DeliveryPolicy, notification: Notification) {
        let attempts = policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match sender
                .send_email(
                    &notification.to_address,
                    &notification.display_name,
                    &notification.subject,
                    &notification.body,
                )
                .await
            {
                Ok(()) => {
                    tracing::debug!(to = %notification.to_address, attempt, "Notification delivered");
                    return;
                }
                Err(e) if attempt < attempts => {
                    tracing::debug!(to = %notification.to_address, attempt, error = %e, "Notification send failed, retrying");
                    tokio::time::sleep(policy.retry_delay).await;
                }
                Err(e) => {
                    tracing::warn!(
                        to = %notification.to_address,
                        subject = %notification.subject,
                        attempts,
                        error = %e,
                        "Notification dropped"
                    );
                }
            }
        }
    }
}

impl NotificationDispatcher for TokioNotificationDispatcher {
    fn dispatch(&self, notifications: Vec<Notification>) -> usize {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    count = notifications.len(),
                    "No async runtime available, notifications dropped"
                );
                return 0;
            }
        };

        let mut scheduled = 0;
        for notification in notifications {
            let sender = Arc::clone(&self.sender);
            let policy = self.policy;
            handle.spawn(Self::deliver(sender, policy, notification));
            scheduled += 1;
        }
        scheduled
    }
}
