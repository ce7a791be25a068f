//! Conference domain module.

mod aggregate;

pub use aggregate::{Conference, MAX_NAME_LENGTH};
