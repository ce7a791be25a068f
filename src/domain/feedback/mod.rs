//! Feedback domain module.
//!
//! Feedback is a rated comment about a session, a conference or a speaker.
//! Every feedback entry is filed under one conference's feedback registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ConferenceId, FeedbackId, Rating, UserId, ValidationError};

/// Maximum length of a feedback comment.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// What the feedback is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackKind {
    Session,
    Conference,
    Speaker,
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedbackKind::Session => "session",
            FeedbackKind::Conference => "conference",
            FeedbackKind::Speaker => "speaker",
        };
        write!(f, "{}", s)
    }
}

/// Feedback entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    id: FeedbackId,
    conference_id: ConferenceId,
    author_id: UserId,
    subject_id: String,
    kind: FeedbackKind,
    rating: Rating,
    comment: String,
}

impl Feedback {
    /// Creates a feedback entry.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the subject id is blank
    /// - `OutOfRange` if the comment is too long
    pub fn new(
        id: FeedbackId,
        conference_id: ConferenceId,
        author_id: UserId,
        subject_id: impl Into<String>,
        kind: FeedbackKind,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let subject_id = subject_id.into();
        if subject_id.trim().is_empty() {
            return Err(ValidationError::empty_field("subject_id"));
        }
        let comment = comment.into();
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(ValidationError::out_of_range(
                "comment",
                0,
                MAX_COMMENT_LENGTH as i32,
                comment.chars().count() as i32,
            ));
        }
        Ok(Self {
            id,
            conference_id,
            author_id,
            subject_id,
            kind,
            rating,
            comment,
        })
    }

    pub fn id(&self) -> &FeedbackId {
        &self.id
    }

    pub fn conference_id(&self) -> &ConferenceId {
        &self.conference_id
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn kind(&self) -> FeedbackKind {
        self.kind
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}
