//! Email transports.

mod smtp;

pub use smtp::{SmtpConfig, SmtpProvider, SmtpTls};

use crate::error::NotificationResult;
use async_trait::async_trait;

/// Outcome reported by the transport for an accepted message.
#[derive(Debug, Clone, Default)]
pub struct SentEmail {
    pub message_id: Option<String>,
}

/// A fully rendered message for one recipient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailContent {
    pub to_email: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// The single capability the invitation flow needs from a mail transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Hand one message to the transport. Errors carry the transport's
    /// diagnostic as `ProviderError`.
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> NotificationResult<bool>;
}
