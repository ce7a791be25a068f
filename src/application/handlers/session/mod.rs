//! Session command and query handlers.

mod create_session;
mod delete_session;
mod list_conference_sessions;
mod update_session;

pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler, DeleteSessionResult};
pub use list_conference_sessions::{ListConferenceSessionsHandler, ListConferenceSessionsQuery};
pub use update_session::{UpdateSessionCommand, UpdateSessionHandler, UpdateSessionResult};
