//! Closed temporal intervals used for scheduling.
//!
//! Both interval types treat their bounds as inclusive: two intervals
//! conflict iff `a.start <= b.end && a.end >= b.start`, so touching
//! endpoints count as a conflict.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A closed `[start, end]` interval of wall-clock instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a window, requiring `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::invalid_format(
                "end_time",
                "start time must be before end time",
            ));
        }
        Ok(Self { start, end })
    }

    /// Creates a window on a single day.
    pub fn on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        Self::new(date.and_time(start), date.and_time(end))
    }

    /// Builds a window from bounds already checked by the caller.
    pub(crate) fn spanning(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Boundary-inclusive overlap test.
    pub fn conflicts_with(&self, other: &TimeWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.start.date(),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// A closed `[start, end]` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, requiring `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::invalid_format(
                "end_date",
                "start date must be before end date",
            ));
        }
        Ok(Self { start, end })
    }

    /// Builds a range from bounds already checked by the caller.
    pub(crate) fn spanning(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True if `date` lies within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Boundary-inclusive overlap test.
    pub fn conflicts_with(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
