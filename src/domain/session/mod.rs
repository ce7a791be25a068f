//! Session domain module.
//!
//! A session is a talk scheduled inside a conference. Sessions are only
//! created, changed and removed through the session workflows, which keep
//! the speaker's schedule, attendee schedules and the conference registry
//! in step with the session store.

mod aggregate;

pub use aggregate::{Session, SessionDetails, MAX_NAME_LENGTH};

#[cfg(test)]
pub(crate) use aggregate::test_support;
