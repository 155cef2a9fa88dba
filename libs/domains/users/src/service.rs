use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, DeleteResponse, UpdateUser, User, UserResponse};
use crate::repository::UserRepository;
use crate::validation::normalize_email;

/// CRUD operations over the directory.
///
/// Inputs are validated here as well as at the HTTP boundary so every caller
/// gets the same contract. Nothing is cached between calls.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(level = "debug", skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        input.validate()?;

        let password_hash = input
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let user = User::new(
            input.name.trim().to_string(),
            normalize_email(&input.email),
            password_hash,
            input.project_id,
        );

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_user(&self, email: &str) -> UserResult<UserResponse> {
        let user = self.repository.get(&normalize_email(email)).await?;
        Ok(user.into())
    }

    #[instrument(level = "debug", skip(self, input))]
    pub async fn update_user(&self, email: &str, mut input: UpdateUser) -> UserResult<UserResponse> {
        input.validate()?;

        input.name = input.name.map(|name| name.trim().to_string());
        input.email = input.email.map(|e| normalize_email(&e));

        let updated = self.repository.update(&normalize_email(email), input).await?;
        Ok(updated.into())
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_user(&self, email: &str) -> UserResult<DeleteResponse> {
        self.repository.delete(&normalize_email(email)).await?;
        Ok(DeleteResponse { ok: true })
    }

    /// Number of stored records. The readiness probe uses it as a store round-trip.
    pub async fn count_users(&self) -> UserResult<usize> {
        self.repository.count().await
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;

    fn create_input(name: &str, email: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            project_id: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_normalizes_and_hashes() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create()
            .withf(|user| {
                user.email == "ada@example.com"
                    && user.name == "Ada"
                    && user
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| h.starts_with("$argon2") && !h.contains("correct horse"))
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(mock_repo);
        let mut input = create_input("  Ada ", "Ada@Example.com");
        input.password = Some("correct horse battery".into());

        let created = service.create_user(input).await.unwrap();
        assert_eq!(created.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email_without_touching_store() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service.create_user(create_input("Ada", "not-an-email")).await;

        match result {
            Err(UserError::Validation(msg)) => assert!(msg.contains("email")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_password() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let mut input = create_input("Ada", "ada@example.com");
        input.password = Some("short".into());

        let result = service.create_user(input).await;
        assert!(matches!(result, Err(UserError::Validation(msg)) if msg.contains("password")));
    }

    #[tokio::test]
    async fn test_create_user_surfaces_duplicate() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create()
            .returning(|user| Err(UserError::DuplicateEmail(user.email)));

        let service = UserService::new(mock_repo);
        let err = service
            .create_user(create_input("Ada", "ada@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn test_get_user_looks_up_normalized_key() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get()
            .withf(|email| email == "ada@example.com")
            .returning(|email| Ok(User::new("Ada".into(), email.to_string(), None, None)));

        let service = UserService::new(mock_repo);
        let user = service.get_user(" ADA@example.com").await.unwrap();
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn test_get_user_not_found_message() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get()
            .returning(|email| Err(UserError::NotFound(email.to_string())));

        let service = UserService::new(mock_repo);
        let err = service.get_user("ghost@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_update_user_rejects_blank_name() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);
        let patch = UpdateUser {
            name: Some("   ".into()),
            ..Default::default()
        };

        let result = service.update_user("ada@example.com", patch).await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_user_passes_only_supplied_fields() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_update()
            .withf(|email, patch| {
                email == "ada@example.com"
                    && patch.name.is_none()
                    && patch.email.is_none()
                    && patch.project_id == Some(None)
            })
            .returning(|email, patch| {
                let mut user = User::new("Ada".into(), email.to_string(), None, Some(9));
                user.apply_update(patch);
                Ok(user)
            });

        let service = UserService::new(mock_repo);
        let patch = UpdateUser {
            project_id: Some(None),
            ..Default::default()
        };

        let updated = service.update_user("ada@example.com", patch).await.unwrap();
        assert_eq!(updated.project_id, None);
        assert_eq!(updated.name, "Ada");
    }

    #[tokio::test]
    async fn test_delete_user_confirms() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_delete()
            .withf(|email| email == "ada@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(mock_repo);
        let response = service.delete_user("ada@example.com").await.unwrap();
        assert!(response.ok);
    }

    #[tokio::test]
    async fn test_count_users_surfaces_store_failure() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_count()
            .times(1)
            .returning(|| Err(UserError::Database("connection reset".into())));

        let service = UserService::new(mock_repo);
        let err = service.count_users().await.unwrap_err();
        assert_eq!(err.to_string(), "Database error: connection reset");
    }
}
