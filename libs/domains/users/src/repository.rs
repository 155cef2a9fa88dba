use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{UpdateUser, User};

/// Keyed store of user records.
///
/// Emails passed in are already normalized. Each call is a single atomic
/// unit: a failed mutation leaves the store unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert `user`, failing with `DuplicateEmail` if its email is taken.
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get(&self, email: &str) -> UserResult<User>;

    /// Apply `patch` to the record keyed by `email`. A changed email is
    /// checked for uniqueness in the same unit as the write.
    async fn update(&self, email: &str, patch: UpdateUser) -> UserResult<User>;

    async fn delete(&self, email: &str) -> UserResult<()>;

    async fn count(&self) -> UserResult<usize>;
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        inner.by_email.insert(user.email.clone(), user.id);
        inner.records.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        tracing::debug!(user_id = %user.id, email = %user.email, "Indexed user by email");
        Ok(user)
    }

    async fn get(&self, email: &str) -> UserResult<User> {
        let inner = self.inner.read().await;
        inner
            .by_email
            .get(email)
            .and_then(|id| inner.records.get(id))
            .cloned()
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    async fn update(&self, email: &str, patch: UpdateUser) -> UserResult<User> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let id = *inner
            .by_email
            .get(email)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        if let Some(new_email) = patch.email.as_deref() {
            if new_email != email && inner.by_email.contains_key(new_email) {
                return Err(UserError::DuplicateEmail(new_email.to_string()));
            }
        }

        let user = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| UserError::Internal(format!("email index points at missing record {}", id)))?;
        user.apply_update(patch);
        let updated = user.clone();

        if updated.email != email {
            inner.by_email.remove(email);
            inner.by_email.insert(updated.email.clone(), id);
        }

        tracing::info!(user_id = %id, "Updated user");
        tracing::debug!(user_id = %id, email = %updated.email, "Indexed user by email");
        Ok(updated)
    }

    async fn delete(&self, email: &str) -> UserResult<()> {
        let mut inner = self.inner.write().await;

        let id = inner
            .by_email
            .remove(email)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;
        inner.records.remove(&id);

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn count(&self) -> UserResult<usize> {
        Ok(self.inner.read().await.records.len())
    }
}
