//! Invitation delivery.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{NotificationError, NotificationResult};
use crate::models::{InvitationEmailData, InviteRequest, InviteResponse};
use crate::providers::{EmailContent, EmailProvider};
use crate::templates::TemplateEngine;

#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Absolute link placed in the invitation
    pub docs_url: String,
    /// Upper bound for a single provider call
    pub send_timeout: Duration,
}

impl InvitationConfig {
    pub fn new(docs_url: impl Into<String>) -> Self {
        Self {
            docs_url: docs_url.into(),
            send_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }
}

/// Emails the documentation link to each requested address.
pub struct InvitationService<P: EmailProvider> {
    provider: Arc<P>,
    templates: Arc<TemplateEngine>,
    config: InvitationConfig,
}

impl<P: EmailProvider> Clone for InvitationService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            templates: Arc::clone(&self.templates),
            config: self.config.clone(),
        }
    }
}

impl<P: EmailProvider> InvitationService<P> {
    pub fn new(provider: P, config: InvitationConfig) -> NotificationResult<Self> {
        Ok(Self {
            provider: Arc::new(provider),
            templates: Arc::new(TemplateEngine::new()?),
            config,
        })
    }

    /// Validate the whole batch, then send one message per address.
    ///
    /// The first failed or timed-out send aborts the call; later addresses
    /// are not attempted.
    #[instrument(skip(self, request), fields(recipients = request.email.len()))]
    pub async fn send_invites(&self, request: InviteRequest) -> NotificationResult<InviteResponse> {
        request.validate()?;

        for address in &request.email {
            let rendered = self.templates.render_invitation(&InvitationEmailData {
                recipient: address.clone(),
                docs_url: self.config.docs_url.clone(),
            })?;

            let content = EmailContent {
                to_email: address.clone(),
                subject: rendered.subject,
                html_body: rendered.html,
                text_body: rendered.text,
            };

            let sent = tokio::time::timeout(self.config.send_timeout, self.provider.send(&content))
                .await
                .map_err(|_| NotificationError::Timeout(self.config.send_timeout.as_secs()))??;

            info!(
                to = %address,
                provider = self.provider.name(),
                message_id = ?sent.message_id,
                "Invitation sent"
            );
        }

        Ok(InviteResponse::sent())
    }

    /// Probe the transport once; failures are reported, not fatal.
    pub async fn verify_provider(&self) -> bool {
        match self.provider.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Email provider unreachable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockEmailProvider, SentEmail};
    use mockall::Sequence;

    fn request(addresses: &[&str]) -> InviteRequest {
        InviteRequest {
            email: addresses.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config() -> InvitationConfig {
        InvitationConfig::new("https://directory.example.com/redoc")
    }

    fn provider() -> MockEmailProvider {
        let mut mock = MockEmailProvider::new();
        mock.expect_name().return_const("mock");
        mock
    }

    #[tokio::test]
    async fn test_sends_once_per_address() {
        let mut mock = provider();
        mock.expect_send()
            .withf(|email| {
                email.subject == "API Documentation Invitation"
                    && email.text_body.contains("https://directory.example.com/redoc")
            })
            .times(2)
            .returning(|_| Ok(SentEmail::default()));

        let service = InvitationService::new(mock, config()).unwrap();
        let response = service
            .send_invites(request(&["ada@example.com", "grace@example.com"]))
            .await
            .unwrap();

        assert_eq!(response.message, "Invitation email has been sent");
    }

    #[tokio::test]
    async fn test_malformed_entry_sends_nothing() {
        let mut mock = provider();
        mock.expect_send().never();

        let service = InvitationService::new(mock, config()).unwrap();
        let result = service
            .send_invites(request(&["ada@example.com", "not-an-email"]))
            .await;

        assert!(matches!(result, Err(NotificationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let mut mock = provider();
        mock.expect_send().never();

        let service = InvitationService::new(mock, config()).unwrap();
        let result = service.send_invites(request(&[])).await;
        assert!(matches!(result, Err(NotificationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let mut seq = Sequence::new();
        let mut mock = provider();
        mock.expect_send()
            .withf(|email| email.to_email == "ada@example.com")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(SentEmail::default()));
        mock.expect_send()
            .withf(|email| email.to_email == "grace@example.com")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(NotificationError::ProviderError("535 auth rejected".into())));

        let service = InvitationService::new(mock, config()).unwrap();
        let err = service
            .send_invites(request(&["ada@example.com", "grace@example.com", "linus@example.com"]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to send email: 535 auth rejected");
    }

    #[tokio::test]
    async fn test_verify_provider_reports_failure() {
        let mut mock = provider();
        mock.expect_health_check()
            .returning(|| Err(NotificationError::ProviderError("connection refused".into())));

        let service = InvitationService::new(mock, config()).unwrap();
        assert!(!service.verify_provider().await);
    }
}
