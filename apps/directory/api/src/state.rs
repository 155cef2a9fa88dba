use crate::api::users::UserStore;
use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pooled PostgreSQL connection, absent for the in-memory store
    pub db: Option<DatabaseConnection>,
    pub users: UserStore,
}

impl AppState {
    pub fn new(config: Config, db: Option<DatabaseConnection>) -> Self {
        let users = UserStore::new(db.as_ref());
        Self { config, db, users }
    }
}
