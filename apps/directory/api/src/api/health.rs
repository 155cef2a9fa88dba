use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use tracing::debug;

/// Readiness: counts records through the user service, and pings
/// PostgreSQL when a pool is configured.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "store",
        Box::pin(async {
            let users = state.users.count_users().await.map_err(|e| e.to_string())?;
            debug!(store = state.users.kind(), users, "User store reachable");
            Ok(())
        }),
    )];

    if let Some(db) = &state.db {
        checks.push((
            "database",
            Box::pin(async move {
                database::postgres::check_health(db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ));
    }

    run_health_checks(checks).await
}
