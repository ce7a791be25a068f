//! Notification Adapters
//!
//! - **TokioNotificationDispatcher** - One spawned task per recipient
//! - **RecordingDispatcher** - Captures scheduled notifications (testing)
//! - **LoggingEmailSender** - Mail boundary that logs each message

mod logging_sender;
mod recording;
mod tokio_dispatcher;

pub use logging_sender::LoggingEmailSender;
pub use recording::RecordingDispatcher;
pub use tokio_dispatcher::{DeliveryPolicy, TokioNotificationDispatcher};
