//! Attendee command handlers.

mod record_attendance;
mod register_attendee;

pub use record_attendance::{RecordAttendanceCommand, RecordAttendanceHandler};
pub use register_attendee::{RegisterAttendeeCommand, RegisterAttendeeHandler, RegisterAttendeeResult};
