//! Notifications Domain
//!
//! Sends the API documentation invitation. The HTTP handler validates the
//! batch, [`InvitationService`] renders the handlebars templates and hands
//! each message to an [`EmailProvider`] (SMTP via lettre in production).
//!
//! ```rust,ignore
//! use domain_notifications::{InvitationConfig, InvitationService, SmtpConfig, SmtpProvider};
//! use core_config::FromEnv;
//!
//! let provider = SmtpProvider::new(SmtpConfig::from_env()?)?;
//! let service = InvitationService::new(provider, InvitationConfig::new(docs_url))?;
//! let router = domain_notifications::handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod service;
pub mod templates;

pub use error::{NotificationError, NotificationResult};
pub use handlers::ApiDoc;
pub use models::{InviteRequest, InviteResponse};
pub use providers::{EmailContent, EmailProvider, SentEmail, SmtpConfig, SmtpProvider, SmtpTls};
pub use service::{InvitationConfig, InvitationService};
pub use templates::TemplateEngine;
