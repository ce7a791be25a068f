//! Adapters - Implementations of port interfaces.
//!
//! - `storage` - File-backed and in-memory keyed stores
//! - `notification` - Mail sender and notification dispatchers

pub mod notification;
pub mod storage;

pub use notification::{DeliveryPolicy, LoggingEmailSender, RecordingDispatcher, TokioNotificationDispatcher};
pub use storage::{FileKeyedStore, InMemoryKeyedStore, RetryPolicy};
