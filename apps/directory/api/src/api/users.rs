use axum::Router;
use domain_users::{
    InMemoryUserRepository, PostgresUserRepository, UserResult, UserService, handlers,
};
use sea_orm::DatabaseConnection;

/// The user service over whichever store the process was started with.
///
/// The HTTP routes and the readiness probe share one service, so the
/// in-memory store they see is the same.
#[derive(Clone)]
pub enum UserStore {
    Postgres(UserService<PostgresUserRepository>),
    Memory(UserService<InMemoryUserRepository>),
}

impl UserStore {
    /// PostgreSQL when a pool is configured, in-memory otherwise.
    pub fn new(db: Option<&DatabaseConnection>) -> Self {
        match db {
            Some(db) => Self::Postgres(UserService::new(PostgresUserRepository::new(db.clone()))),
            None => Self::Memory(UserService::new(InMemoryUserRepository::new())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    pub async fn count_users(&self) -> UserResult<usize> {
        match self {
            Self::Postgres(service) => service.count_users().await,
            Self::Memory(service) => service.count_users().await,
        }
    }
}

pub fn router(store: &UserStore) -> Router {
    match store {
        UserStore::Postgres(service) => handlers::router(service.clone()),
        UserStore::Memory(service) => handlers::router(service.clone()),
    }
}
