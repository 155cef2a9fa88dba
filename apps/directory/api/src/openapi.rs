use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "User Directory API",
        version = "0.1.0",
        description = "User records keyed by email address, plus documentation invitations"
    ),
    servers((url = "/api", description = "API base path")),
    nest(
        (path = "/users", api = domain_users::ApiDoc),
        (path = "/invite", api = domain_notifications::ApiDoc)
    )
)]
pub struct ApiDoc;
