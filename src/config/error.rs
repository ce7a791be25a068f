//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Write attempts must be at least 1")]
    InvalidWriteAttempts,

    #[error("Delivery attempts must be at least 1")]
    InvalidDeliveryAttempts,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
