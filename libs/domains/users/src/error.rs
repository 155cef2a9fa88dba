use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{ErrorCode, ErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// Malformed input, naming the offending field
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail(String),

    #[error("User not found")]
    NotFound(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Backing store unavailable or failing
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<validator::ValidationErrors> for UserError {
    fn from(errors: validator::ValidationErrors) -> Self {
        UserError::Validation(crate::validation::describe(&errors))
    }
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Database(err.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            UserError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationError, msg.clone()),
            ),
            UserError::DuplicateEmail(email) => {
                tracing::debug!(email = %email, "Rejected duplicate email");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::Conflict, self.to_string()),
                )
            }
            UserError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotFound, self.to_string()),
            ),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError, "An internal error occurred"),
                )
            }
            UserError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::DatabaseError, self.to_string()),
                )
            }
            UserError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError, "An internal error occurred"),
                )
            }
        };

        body.into_response_with(status)
    }
}
