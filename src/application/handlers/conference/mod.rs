//! Conference command handlers.

mod create_conference;

pub use create_conference::{CreateConferenceCommand, CreateConferenceHandler, CreateConferenceResult};
