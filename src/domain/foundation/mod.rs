//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the conference domain.

mod errors;
mod ids;
mod rating;
mod time_window;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConferenceId, FeedbackId, SessionId, UserId};
pub use rating::Rating;
pub use time_window::{DateRange, TimeWindow};
