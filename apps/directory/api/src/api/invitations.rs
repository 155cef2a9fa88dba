use crate::config::Config;
use axum::Router;
use domain_notifications::{
    EmailProvider, InvitationConfig, InvitationService, NotificationResult, SmtpProvider, handlers,
};
use std::time::Duration;

/// Invitation service over the SMTP relay from `config.smtp`.
///
/// Each send is bounded by the same timeout the transport uses.
pub fn smtp_service(config: &Config) -> NotificationResult<InvitationService<SmtpProvider>> {
    let send_timeout = Duration::from_secs(config.smtp.timeout_secs);
    let provider = SmtpProvider::new(config.smtp.clone())?;

    InvitationService::new(
        provider,
        InvitationConfig::new(config.docs_url.clone()).with_send_timeout(send_timeout),
    )
}

pub fn router<P: EmailProvider + 'static>(service: InvitationService<P>) -> Router {
    handlers::router(service)
}
