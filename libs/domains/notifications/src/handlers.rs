use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::NotificationResult;
use crate::models::{InviteRequest, InviteResponse};
use crate::providers::EmailProvider;
use crate::service::InvitationService;

#[derive(OpenApi)]
#[openapi(
    paths(send_invite),
    components(schemas(InviteRequest, InviteResponse, ErrorResponse)),
    tags((name = "invitations", description = "Email the API documentation link"))
)]
pub struct ApiDoc;

/// Routes relative to the mount point (`/api/invite` in the service).
pub fn router<P: EmailProvider + 'static>(service: InvitationService<P>) -> Router {
    Router::new()
        .route("/", post(send_invite))
        .with_state(Arc::new(service))
}

/// Send documentation invitations
///
/// Every address is validated before anything is sent. Delivery stops at
/// the first failure and the transport's diagnostic is returned.
#[utoipa::path(
    post,
    path = "",
    tag = "invitations",
    request_body = InviteRequest,
    responses(
        (status = 200, description = "All invitations sent", body = InviteResponse),
        (status = 400, description = "Empty batch or malformed address", body = ErrorResponse),
        (status = 500, description = "Delivery failed", body = ErrorResponse)
    )
)]
async fn send_invite<P: EmailProvider>(
    State(service): State<Arc<InvitationService<P>>>,
    ValidatedJson(request): ValidatedJson<InviteRequest>,
) -> NotificationResult<Json<InviteResponse>> {
    let response = service.send_invites(request).await?;
    Ok(Json(response))
}
