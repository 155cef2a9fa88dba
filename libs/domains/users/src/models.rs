use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{deserialize_some, normalized_email, not_blank, some_normalized_email};

/// A directory entry. `email` is unique and is the key clients address it by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Normalized (trimmed, lowercase)
    pub email: String,
    pub name: String,
    /// Argon2 PHC string, never exposed in API responses
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `email` must already be normalized.
    pub fn new(
        name: String,
        email: String,
        password_hash: Option<String>,
        project_id: Option<i64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            name,
            password_hash,
            project_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields of `patch`; absent fields are untouched.
    pub fn apply_update(&mut self, patch: UpdateUser) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        self.updated_at = Utc::now();
    }
}

/// A user as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            project_id: user.project_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Display name; also accepted as `username`
    #[serde(alias = "username")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[serde(deserialize_with = "normalized_email")]
    #[validate(email, length(max = 255))]
    pub email: String,
    #[serde(default)]
    pub project_id: Option<i64>,
    /// Optional credential, stored hashed
    #[serde(default)]
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// Sparse update. Absent fields are left alone; `project_id: null` clears
/// the association while `name: null` or `email: null` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[serde(default, alias = "username", deserialize_with = "deserialize_some")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "some_normalized_email")]
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub project_id: Option<Option<i64>>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.project_id.is_none()
    }
}

/// Confirmation returned by delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub ok: bool,
}
