//! Scheduling Module - Pure conflict rules for sessions and conferences.
//!
//! Stateless functions over domain objects: name uniqueness, time-slot
//! overlap, speaker availability and conference-bounds containment.
//! No ports or adapters are involved.

mod conflicts;

pub use conflicts::ConflictValidator;
