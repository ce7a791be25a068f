//! Recording notification dispatcher for testing.
//!
//! Captures scheduled notifications instead of delivering them, so tests
//! can assert "N notifications were scheduled" without real concurrency.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned.

use std::sync::RwLock;

use crate::ports::{Notification, NotificationDispatcher};

/// Dispatcher that records every scheduled notification.
///
/// # Example
///
/// ```ignore
/// let dispatcher = Arc::new(RecordingDispatcher::new());
/// handler.handle(cmd).await?;
/// assert_eq!(dispatcher.scheduled_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    scheduled: RwLock<Vec<Notification>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all scheduled notifications.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn scheduled(&self) -> Vec<Notification> {
        self.scheduled
            .read()
            .expect("RecordingDispatcher: scheduled lock poisoned")
            .clone()
    }

    /// Returns count of scheduled notifications.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
            .read()
            .expect("RecordingDispatcher: scheduled lock poisoned")
            .len()
    }

    /// Addresses notified, in scheduling order.
    pub fn recipients(&self) -> Vec<String> {
        self.scheduled()
            .into_iter()
            .map(|n| n.to_address)
            .collect()
    }

    /// Clears all recorded notifications (for test isolation).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear(&self) {
        self.scheduled
            .write()
            .expect("RecordingDispatcher: scheduled write lock poisoned")
            .clear();
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, notifications: Vec<Notification>) -> usize {
        let count = notifications.len();
        self.scheduled
            .write()
            .expect("RecordingDispatcher: scheduled write lock poisoned")
            .extend(notifications);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_notification() {
        let dispatcher = RecordingDispatcher::new();
        let scheduled = dispatcher.dispatch(vec![
            Notification::new("a@example.com", "A", "Hi", "Body"),
            Notification::new("b@example.com", "B", "Hi", "Body"),
        ]);

        assert_eq!(scheduled, 2);
        assert_eq!(dispatcher.scheduled_count(), 2);
        assert_eq!(dispatcher.recipients(), vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn clear_resets() {
        let dispatcher = RecordingDispatcher::new();
        dispatcher.dispatch(vec![Notification::new("a@example.com", "A", "Hi", "Body")]);
        dispatcher.clear();
        assert_eq!(dispatcher.scheduled_count(), 0);
    }
}
