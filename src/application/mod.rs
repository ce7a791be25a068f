//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers validate a request, then drive a [`Saga`] of store writes and
//! hand notifications to the dispatcher once the saga commits.

pub mod handlers;
pub mod saga;

pub use handlers::{
    CreateConferenceCommand, CreateConferenceHandler, CreateConferenceResult,
    CreateSessionCommand, CreateSessionHandler, CreateSessionResult,
    DeleteSessionCommand, DeleteSessionHandler, DeleteSessionResult,
    GetSpeakerScheduleHandler, GetSpeakerScheduleQuery,
    ListConferenceSessionsHandler, ListConferenceSessionsQuery,
    RecordAttendanceCommand, RecordAttendanceHandler,
    RegisterAttendeeCommand, RegisterAttendeeHandler, RegisterAttendeeResult,
    SubmitFeedbackCommand, SubmitFeedbackHandler,
    UpdateSessionCommand, UpdateSessionHandler, UpdateSessionResult,
};
pub use saga::{Saga, SagaFailure, WorkflowLock};
