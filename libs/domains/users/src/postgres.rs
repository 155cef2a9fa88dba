use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, SqlErr, TransactionTrait,
};

use crate::entity;
use crate::error::{UserError, UserResult};
use crate::models::{UpdateUser, User};
use crate::repository::UserRepository;

/// PostgreSQL-backed store. Uniqueness rests on the `users.email` unique key.
#[derive(Clone)]
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unique-key violations become `DuplicateEmail`, everything else a store error.
fn map_write_err(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::from(err),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let active: entity::ActiveModel = user.into();

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, &email))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get(&self, email: &str) -> UserResult<User> {
        entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::from)
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    async fn update(&self, email: &str, patch: UpdateUser) -> UserResult<User> {
        let txn = self.db.begin().await?;

        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        if let Some(new_email) = patch.email.as_deref() {
            if new_email != email {
                let taken = entity::Entity::find()
                    .filter(entity::Column::Email.eq(new_email))
                    .one(&txn)
                    .await?
                    .is_some();
                if taken {
                    return Err(UserError::DuplicateEmail(new_email.to_string()));
                }
            }
        }

        let mut user = User::from(model);
        user.apply_update(patch);

        let active = entity::ActiveModel {
            id: Unchanged(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            project_id: Set(user.project_id),
            updated_at: Set(user.updated_at),
            ..Default::default()
        };

        // A concurrent insert can still claim the address between check and write
        let model = active
            .update(&txn)
            .await
            .map_err(|e| map_write_err(e, &user.email))?;
        txn.commit().await?;

        tracing::info!(user_id = %model.id, "Updated user");
        tracing::debug!(user_id = %model.id, email = %model.email, "User email after update");
        Ok(model.into())
    }

    async fn delete(&self, email: &str) -> UserResult<()> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::Email.eq(email))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(email.to_string()));
        }

        tracing::info!(rows = result.rows_affected, "Deleted user");
        tracing::debug!(email = %email, "Deleted user by email");
        Ok(())
    }

    async fn count(&self) -> UserResult<usize> {
        let total = entity::Entity::find().count(&self.db).await?;
        Ok(total as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    fn model(email: &str) -> entity::Model {
        let now = Utc::now();
        entity::Model {
            id: Uuid::now_v7(),
            email: email.to_string(),
            name: "Ada".to_string(),
            password_hash: Some("$argon2id$hash".to_string()),
            project_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_maps_row_to_user() {
        let row = model("ada@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();

        let user = PostgresUserRepository::new(db).get("ada@example.com").await.unwrap();
        assert_eq!(user.id, row.id);
        assert_eq!(user.password_hash.as_deref(), Some("$argon2id$hash"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();

        let result = PostgresUserRepository::new(db).get("ghost@example.com").await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_without_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = PostgresUserRepository::new(db).delete("ghost@example.com").await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("ada@example.com")], vec![model("grace@example.com")]])
            .into_connection();

        let patch = UpdateUser {
            email: Some("grace@example.com".into()),
            ..Default::default()
        };
        let result = PostgresUserRepository::new(db).update("ada@example.com", patch).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_query_failure_is_store_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".into())])
            .into_connection();

        let result = PostgresUserRepository::new(db).get("ada@example.com").await;
        match result {
            Err(UserError::Database(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("expected store error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_rekeys_inside_transaction() {
        let current = model("ada@example.com");
        let mut stored = current.clone();
        stored.email = "lovelace@example.com".to_string();
        stored.project_id = Some(7);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()], vec![], vec![stored.clone()]])
            .into_connection();

        let patch = UpdateUser {
            email: Some("lovelace@example.com".into()),
            project_id: Some(Some(7)),
            ..Default::default()
        };
        let user = PostgresUserRepository::new(db)
            .update("ada@example.com", patch)
            .await
            .unwrap();

        assert_eq!(user.id, current.id);
        assert_eq!(user.email, "lovelace@example.com");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.project_id, Some(7));
    }

    #[tokio::test]
    async fn test_create_failure_other_than_unique_is_store_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("disk full".into())])
            .into_connection();

        let user = User::new("Ada".into(), "ada@example.com".into(), None, None);
        let result = PostgresUserRepository::new(db).create(user).await;
        assert!(matches!(result, Err(UserError::Database(_))));
    }
}
