//! SMTP provider built on lettre.

use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmtpTls {
    /// Plaintext, for local catchers like Mailpit
    None,
    /// Upgrade a plaintext connection (submission port 587)
    #[default]
    StartTls,
    /// TLS from the first byte (port 465)
    Tls,
}

impl SmtpTls {
    pub fn default_port(self) -> u16 {
        match self {
            SmtpTls::None => 25,
            SmtpTls::StartTls => 587,
            SmtpTls::Tls => 465,
        }
    }
}

impl FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "false" | "plain" => Ok(SmtpTls::None),
            "starttls" | "true" | "on" => Ok(SmtpTls::StartTls),
            "tls" | "ssl" | "implicit" => Ok(SmtpTls::Tls),
            other => Err(format!(
                "unknown TLS mode '{}', expected none, starttls or tls",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: SmtpTls,
    /// Connect and command timeout for the transport
    pub timeout_secs: u64,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: SmtpTls::default().default_port(),
            from_email: from_email.into(),
            from_name: "User Directory".to_string(),
            username: None,
            password: None,
            tls: SmtpTls::default(),
            timeout_secs: 30,
        }
    }

    /// Switch TLS mode and move to that mode's standard port.
    pub fn with_tls(mut self, tls: SmtpTls) -> Self {
        self.tls = tls;
        self.port = tls.default_port();
        self
    }
}

/// Reads `SMTP_HOST`, `SMTP_PORT`, `SMTP_TLS`, `SMTP_USERNAME`,
/// `SMTP_PASSWORD`, `SMTP_FROM_EMAIL`, `SMTP_FROM_NAME` and
/// `SMTP_TIMEOUT_SECS`. The sender defaults to the login name.
impl FromEnv for SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let tls: SmtpTls = env_parse_or("SMTP_TLS", SmtpTls::default())?;
        let username = env_optional("SMTP_USERNAME");
        let from_email = env_optional("SMTP_FROM_EMAIL")
            .or_else(|| username.clone())
            .unwrap_or_else(|| "noreply@localhost".to_string());

        Ok(Self {
            host: env_or_default("SMTP_HOST", "localhost"),
            port: env_parse_or("SMTP_PORT", tls.default_port())?,
            from_email,
            from_name: env_or_default("SMTP_FROM_NAME", "User Directory"),
            username,
            password: env_optional("SMTP_PASSWORD"),
            tls,
            timeout_secs: env_parse_or("SMTP_TIMEOUT_SECS", 30)?,
        })
    }
}

pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> NotificationResult<Self> {
        let transport = build_transport(&config)?;
        Ok(Self { transport, config })
    }

    fn build_message(&self, email: &EmailContent) -> NotificationResult<Message> {
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| NotificationError::ConfigError(format!("Invalid from address: {}", e)))?;

        let to: Mailbox = email
            .to_email
            .parse()
            .map_err(|_| NotificationError::InvalidEmail(email.to_email.clone()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::ProviderError(format!("Failed to build message: {}", e)))
    }
}

fn build_transport(config: &SmtpConfig) -> NotificationResult<AsyncSmtpTransport<Tokio1Executor>> {
    let relay_err = |e: lettre::transport::smtp::Error| {
        NotificationError::ConfigError(format!("Invalid SMTP relay '{}': {}", config.host, e))
    };

    let mut builder = match config.tls {
        SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        SmtpTls::StartTls => {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host).map_err(relay_err)?
        }
        SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(relay_err)?,
    }
    .port(config.port)
    .timeout(Some(Duration::from_secs(config.timeout_secs)));

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    Ok(builder.build())
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        debug!(
            to = %email.to_email,
            subject = %email.subject,
            host = %self.config.host,
            port = self.config.port,
            tls = ?self.config.tls,
            "Sending email via SMTP"
        );

        let message = self.build_message(email)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!(to = %email.to_email, error = %e, "SMTP send failed");
            NotificationError::ProviderError(e.to_string())
        })?;

        let message_id = response.message().next().map(|s| s.to_string());
        info!(to = %email.to_email, message_id = ?message_id, "Email sent via SMTP");

        Ok(SentEmail { message_id })
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| NotificationError::ProviderError(format!("SMTP health check failed: {}", e)))
    }
}
