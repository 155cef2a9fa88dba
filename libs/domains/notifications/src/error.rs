//! Error types for the notifications domain.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{ErrorCode, ErrorResponse};
use thiserror::Error;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// A recipient failed address syntax; nothing was sent.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transport failure, carrying the provider's diagnostic.
    #[error("Failed to send email: {0}")]
    ProviderError(String),

    #[error("Failed to send email: no response from provider after {0}s")]
    Timeout(u64),

    #[error("Template rendering error: {0}")]
    TemplateError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<handlebars::RenderError> for NotificationError {
    fn from(err: handlebars::RenderError) -> Self {
        NotificationError::TemplateError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for NotificationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        NotificationError::Validation(errors.to_string())
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match &self {
            NotificationError::InvalidEmail(_) | NotificationError::Validation(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError)
            }
            NotificationError::ProviderError(_) => {
                tracing::error!(error = %message, "Invitation delivery failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::EmailDelivery)
            }
            NotificationError::Timeout(_) => {
                tracing::error!(error = %message, "Invitation delivery timed out");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DependencyTimeout)
            }
            NotificationError::TemplateError(_) | NotificationError::ConfigError(_) => {
                tracing::error!(error = %message, "Invitation could not be prepared");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        };

        ErrorResponse::new(code, message).into_response_with(status)
    }
}
