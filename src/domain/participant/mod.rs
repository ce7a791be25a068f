//! Participant aggregates: organizers, speakers and attendees.
//!
//! Speaker and attendee schedules are side effects of the session
//! workflows; nothing else mutates them.

mod attendee;
mod organizer;
mod speaker;

pub use attendee::Attendee;
pub use organizer::Organizer;
pub use speaker::{ScheduleEntry, Speaker};
