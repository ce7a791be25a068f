//! Conference Sessions - session and conference lifecycle orchestration
//!
//! Creates, updates and deletes sessions inside conferences while keeping
//! several independently persisted stores (sessions, conferences, speaker
//! and attendee schedules) in step through compensating workflows.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
