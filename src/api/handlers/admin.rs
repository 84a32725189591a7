//! Admin review and approval of provider applications.
//!
//! Mounted behind `auth_middleware` and `require_admin`.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ADMIN_TAG;
use crate::api::dto::{
    ApprovalResponse, ErrorResponse, ListApplicationsQuery, PagedResponse,
    RejectApplicationRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::ProviderApplication;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Routes:
/// - GET /               - List applications
/// - GET /{id}           - Get application
/// - POST /{id}/review   - Start reviewing
/// - POST /{id}/approve  - Approve and provision the provider
/// - POST /{id}/reject   - Reject
pub fn admin_application_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_applications))
        .routes(routes!(get_application))
        .routes(routes!(review_application))
        .routes(routes!(approve_application))
        .routes(routes!(reject_application))
}

/// GET /api/admin/applications - List applications, newest first
#[utoipa::path(
    get,
    path = "/",
    tag = ADMIN_TAG,
    params(ListApplicationsQuery),
    responses(
        (status = 200, description = "One page of applications", body = PagedResponse<ProviderApplication>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_applications(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListApplicationsQuery>,
) -> AppResult<Json<PagedResponse<ProviderApplication>>> {
    let (applications, has_next) = state
        .services
        .applications
        .list(query.status, query.page, query.page_size)
        .await?;

    Ok(Json(PagedResponse::new(
        applications,
        query.page,
        query.page_size,
        has_next,
    )))
}

/// GET /api/admin/applications/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ADMIN_TAG,
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application found", body = ProviderApplication),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProviderApplication>> {
    Ok(Json(state.services.applications.get(id).await?))
}

/// POST /api/admin/applications/{id}/review - Move a submitted application into review
#[utoipa::path(
    post,
    path = "/{id}/review",
    tag = ADMIN_TAG,
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application is in review", body = ProviderApplication),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 409, description = "Application already decided", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn review_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProviderApplication>> {
    Ok(Json(state.services.applications.review(id).await?))
}

/// POST /api/admin/applications/{id}/approve - Approve and provision the provider
///
/// Safe to repeat: an approved application returns `already_approved`.
/// The temporary credential is returned once, for manual relay when the
/// welcome email could not be delivered.
#[utoipa::path(
    post,
    path = "/{id}/approve",
    tag = ADMIN_TAG,
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application approved, or already approved", body = ApprovalResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 409, description = "Application was rejected", body = ErrorResponse),
        (status = 500, description = "A provisioning step failed; retry resumes", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn approve_application(
    State(state): State<AppState>,
    axum::Extension(admin): axum::Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApprovalResponse>> {
    info!(application_id = id, admin_id = %admin.id, "Approval requested");
    let result = state.services.approvals.approve(id).await?;
    Ok(Json(result.into()))
}

/// POST /api/admin/applications/{id}/reject
#[utoipa::path(
    post,
    path = "/{id}/reject",
    tag = ADMIN_TAG,
    params(("id" = i64, Path, description = "Application ID")),
    request_body = RejectApplicationRequest,
    responses(
        (status = 200, description = "Application rejected", body = ProviderApplication),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 409, description = "Application already approved", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn reject_application(
    State(state): State<AppState>,
    axum::Extension(admin): axum::Extension<AuthUser>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<RejectApplicationRequest>,
) -> AppResult<Json<ProviderApplication>> {
    info!(application_id = id, admin_id = %admin.id, force = req.force, "Rejection requested");
    let application = state
        .services
        .applications
        .reject(id, req.reason, req.force)
        .await?;
    Ok(Json(application))
}
