use axum::Router;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use domain_notifications::{EmailProvider, InvitationService};
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = match config.database.clone() {
        Some(database) => {
            let db = connect_from_config_with_retry(database, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
            run_migrations::<Migrator>(&db, config.app.name).await?;
            info!("Using PostgreSQL user store");
            Some(db)
        }
        None => {
            warn!("DATABASE_URL not set, records are kept in memory and lost on exit");
            None
        }
    };

    let invitations = api::invitations::smtp_service(&config)?;
    if invitations.verify_provider().await {
        info!(host = %config.smtp.host, port = config.smtp.port, "SMTP relay reachable");
    }

    let state = AppState::new(config, db);
    let app = build_app(state.clone(), invitations)?;

    info!("Starting directory API with production-ready shutdown (30s timeout)");

    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Directory API shutdown complete");
    Ok(())
}

/// API under `/api`, docs, `/health` and `/ready`.
fn build_app<P: EmailProvider + 'static>(
    state: AppState,
    invitations: InvitationService<P>,
) -> eyre::Result<Router> {
    let api_routes = api::routes(&state, invitations);
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state)))
}
