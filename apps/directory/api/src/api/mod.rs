use crate::state::AppState;
use axum::{Router, routing::get};
use domain_notifications::{EmailProvider, InvitationService};

pub mod health;
pub mod invitations;
pub mod users;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes<P: EmailProvider + 'static>(
    state: &AppState,
    invitations: InvitationService<P>,
) -> Router {
    Router::new()
        .nest("/users", users::router(&state.users))
        .nest("/invite", invitations::router(invitations))
}

/// `/ready` with real store checks, mergeable into the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
