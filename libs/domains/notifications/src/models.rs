//! Data models for the notifications domain.

use lettre::Address;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

/// Recipients of an API documentation invitation.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct InviteRequest {
    /// One or more addresses; a single bad entry rejects the batch
    #[serde(deserialize_with = "trimmed_addresses")]
    #[validate(
        length(min = 1, message = "at least one address is required"),
        custom(function = "all_valid_emails")
    )]
    #[schema(example = json!(["ada@example.com"]))]
    pub email: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InviteResponse {
    pub message: String,
}

impl InviteResponse {
    pub fn sent() -> Self {
        Self {
            message: "Invitation email has been sent".to_string(),
        }
    }
}

/// Template variables for the invitation email.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationEmailData {
    pub recipient: String,
    pub docs_url: String,
}

fn trimmed_addresses<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|e| e.trim().to_string()).collect())
}

/// Every entry must satisfy both the validator grammar and the one the
/// SMTP transport parses recipients with, so nothing is rejected mid-batch.
fn all_valid_emails(addresses: &[String]) -> Result<(), ValidationError> {
    if let Some(bad) = addresses
        .iter()
        .find(|e| !e.validate_email() || e.parse::<Address>().is_err())
    {
        let mut err = ValidationError::new("email");
        err.message = Some(format!("'{}' is not a valid email address", bad).into());
        err.add_param("value".into(), bad);
        return Err(err);
    }
    Ok(())
}
