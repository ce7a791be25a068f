//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `KeyedStore` - Per-aggregate write-through persistence
//! - `EmailSender` - Mail boundary
//! - `NotificationDispatcher` - Fire-and-forget delivery scheduling

mod keyed_store;
mod notification;

pub use keyed_store::{KeyedStore, StoreError};
pub use notification::{DeliveryError, EmailSender, Notification, NotificationDispatcher};
