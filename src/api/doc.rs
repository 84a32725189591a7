use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const APPLICATION_TAG: &str = "Applications";
pub const ADMIN_TAG: &str = "Admin";
pub const CATEGORY_TAG: &str = "Categories";
pub const PROFILE_TAG: &str = "Profiles";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Domify",
        description = "Backend for the Domify services marketplace",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::models::ApplicationStatus,
        )
    ),
    tags(
        (name = APPLICATION_TAG, description = "Provider application submission"),
        (name = ADMIN_TAG, description = "Provider application review and approval"),
        (name = CATEGORY_TAG, description = "Service category catalogue"),
        (name = PROFILE_TAG, description = "Customer profile self-service"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token issued by the hosted backend"))
                        .build(),
                ),
            )
        }
    }
}
