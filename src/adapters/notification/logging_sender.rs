//! LoggingEmailSender - mail boundary that records messages in the log.
//!
//! Stands in for a real mail transport: each message is validated and
//! emitted as a structured `info` event with the configured sender.

use async_trait::async_trait;

use crate::config::NotificationConfig;
use crate::ports::{DeliveryError, EmailSender};

/// E-mail sender that writes messages to the tracing log.
#[derive(Debug, Clone)]
pub struct LoggingEmailSender {
    from: String,
}

impl LoggingEmailSender {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.from_header())
    }

    pub fn from_header(&self) -> &str {
        &self.from
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_email(
        &self,
        to_address: &str,
        display_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        if !to_address.contains('@') {
            return Err(DeliveryError::InvalidRecipient(to_address.to_string()));
        }
        tracing::info!(
            from = %self.from,
            to = %format!("{} <{}>", display_name, to_address),
            subject,
            body_len = body.len(),
            "Email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_plausible_address() {
        let sender = LoggingEmailSender::new("Conference Desk <desk@example.com>");
        assert!(sender.send_email("ada@example.com", "Ada", "Hi", "Body").await.is_ok());
    }

    #[tokio::test]
    async fn rejects_address_without_at() {
        let sender = LoggingEmailSender::new("desk@example.com");
        let err = sender.send_email("nobody", "Nobody", "Hi", "Body").await.unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidRecipient(_)));
    }

    #[test]
    fn builds_from_config() {
        let config = NotificationConfig::default();
        let sender = LoggingEmailSender::from_config(&config);
        assert_eq!(sender.from_header(), config.from_header());
    }
}
