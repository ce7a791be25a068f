//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations across
//! the per-aggregate stores.

pub mod attendee;
pub mod conference;
pub mod feedback;
pub mod session;
pub mod speaker;

mod support;
#[cfg(test)]
pub(crate) mod test_world;

pub use attendee::{
    RecordAttendanceCommand, RecordAttendanceHandler, RegisterAttendeeCommand,
    RegisterAttendeeHandler, RegisterAttendeeResult,
};
pub use conference::{CreateConferenceCommand, CreateConferenceHandler, CreateConferenceResult};
pub use feedback::{SubmitFeedbackCommand, SubmitFeedbackHandler};
pub use session::{
    CreateSessionCommand, CreateSessionHandler, CreateSessionResult, DeleteSessionCommand,
    DeleteSessionHandler, DeleteSessionResult, ListConferenceSessionsHandler,
    ListConferenceSessionsQuery, UpdateSessionCommand, UpdateSessionHandler, UpdateSessionResult,
};
pub use speaker::{GetSpeakerScheduleHandler, GetSpeakerScheduleQuery};
