//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, error_response_middleware, logging_middleware, request_id_middleware,
    require_admin,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests with request IDs
/// 3. CORS and compression
/// 4. Error responses - normalizes error bodies and stamps the request ID
/// 5. Request timeout
///
/// # Routes
/// - `/api/applications` - Public application submission
/// - `/api/categories` - Public category catalogue
/// - `/api/profiles` - Customer profile self-service (bearer token)
/// - `/api/admin/applications` - Review and approval (admin role)
/// - `/health`, `/health/ready`, `/health/live`
/// - `/swagger-ui`, `/api-docs/openapi.json`
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // Layers run bottom-up: authentication before the role check
    let admin_routes = OpenApiRouter::new()
        .nest(
            "/applications",
            handlers::admin::admin_application_routes(),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let profile_routes = handlers::profiles::profile_routes()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = OpenApiRouter::new()
        .nest("/applications", handlers::applications::application_routes())
        .nest("/categories", handlers::categories::category_routes())
        .nest("/profiles", profile_routes)
        .nest("/admin", admin_routes);

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(error_response_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
