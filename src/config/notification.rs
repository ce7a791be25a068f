//! Notification configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::notification::DeliveryPolicy;

/// Outbound e-mail configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Sends tried per recipient before dropping the message
    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,

    /// Pause between send attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl NotificationConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn delivery_policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            max_attempts: self.max_delivery_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.max_delivery_attempts == 0 {
            return Err(ValidationError::InvalidDeliveryAttempts);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            from_email: default_from_email(),
            from_name: default_from_name(),
            max_delivery_attempts: default_max_delivery_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@conference.local".to_string()
}

fn default_from_name() -> String {
    "Conference Desk".to_string()
}

fn default_max_delivery_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}
