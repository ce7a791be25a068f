//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error kinds surfaced by every lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Pre-flight rejection: name taken, time conflict, speaker busy, out of bounds.
    ValidationFailed,
    /// A referenced session, conference or participant does not exist.
    NotFound,
    /// A store write exhausted its retries.
    PersistenceFailed,
    /// Linking a session to a speaker, attendee or conference failed.
    AssignmentFailed,
    /// A compensation failed. Logged, never returned as the primary error.
    RollbackFailed,
}

impl ErrorCode {
    /// True for kinds raised before any workflow step runs.
    pub fn is_pre_flight(&self) -> bool {
        matches!(self, ErrorCode::ValidationFailed | ErrorCode::NotFound)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::PersistenceFailed => "PERSISTENCE_FAILED",
            ErrorCode::AssignmentFailed => "ASSIGNMENT_FAILED",
            ErrorCode::RollbackFailed => "ROLLBACK_FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// The message is safe to show to an end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a not-found error for an entity of the given kind.
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            .with_detail("entity", entity)
            .with_detail("id", id.to_string())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceFailed, message)
    }

    pub fn assignment(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AssignmentFailed, message)
    }

    pub fn rollback(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RollbackFailed, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Prefixes the message with operation context, keeping code and details.
    pub fn context(mut self, prefix: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", prefix, self.message);
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::validation(err.field().to_string(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("name");
        assert_eq!(format!("{}", err), "Field 'name' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("rating", 1, 5, 9);
        assert_eq!(
            format!("{}", err),
            "Field 'rating' must be between 1 and 5, got 9"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::not_found("Session", "abc");
        assert_eq!(format!("{}", err), "[NOT_FOUND] Session not found: abc");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::validation("name", "Name already taken").with_detail("name", "Keynote");

        assert_eq!(err.details.get("field"), Some(&"name".to_string()));
        assert_eq!(err.details.get("name"), Some(&"Keynote".to_string()));
    }

    #[test]
    fn context_prefixes_message_and_keeps_code() {
        let err = DomainError::persistence("disk full").context("create session");
        assert_eq!(err.code, ErrorCode::PersistenceFailed);
        assert_eq!(err.message, "create session: disk full");
    }

    #[test]
    fn validation_error_converts_to_validation_failed() {
        let err: DomainError = ValidationError::empty_field("room").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"room".to_string()));
    }

    #[test]
    fn only_validation_and_not_found_are_pre_flight() {
        assert!(ErrorCode::ValidationFailed.is_pre_flight());
        assert!(ErrorCode::NotFound.is_pre_flight());
        assert!(!ErrorCode::PersistenceFailed.is_pre_flight());
        assert!(!ErrorCode::AssignmentFailed.is_pre_flight());
        assert!(!ErrorCode::RollbackFailed.is_pre_flight());
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::RollbackFailed), "ROLLBACK_FAILED");
        assert_eq!(format!("{}", ErrorCode::AssignmentFailed), "ASSIGNMENT_FAILED");
    }
}
