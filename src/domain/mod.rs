//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, time windows, rating, errors)
//! - `session` - Session aggregate
//! - `conference` - Conference aggregate and its registries
//! - `participant` - Organizer, speaker and attendee aggregates
//! - `feedback` - Rated feedback entries
//! - `scheduling` - Pure conflict validation

pub mod conference;
pub mod feedback;
pub mod foundation;
pub mod participant;
pub mod scheduling;
pub mod session;
