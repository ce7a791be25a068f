//! Rating value object for feedback (1 to 5 stars).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Feedback rating: 1 (poor) to 5 (excellent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a Rating from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range(
                "rating",
                Self::MIN as i32,
                Self::MAX as i32,
                value as i32,
            ))
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Poor",
            2 => "Fair",
            3 => "Good",
            4 => "Very Good",
            _ => "Excellent",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from_u8(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
