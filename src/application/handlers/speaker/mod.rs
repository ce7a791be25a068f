//! Speaker query handlers.

mod get_speaker_schedule;

pub use get_speaker_schedule::{GetSpeakerScheduleHandler, GetSpeakerScheduleQuery};
