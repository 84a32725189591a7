//! Public provider application submission.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::APPLICATION_TAG;
use crate::api::dto::{ErrorResponse, SubmitApplicationRequest};
use crate::error::AppResult;
use crate::models::ProviderApplication;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn application_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(submit_application))
}

/// POST /api/applications - Apply to become a provider
#[utoipa::path(
    post,
    path = "/",
    tag = APPLICATION_TAG,
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = ProviderApplication),
        (status = 400, description = "Invalid application", body = ErrorResponse)
    )
)]
async fn submit_application(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SubmitApplicationRequest>,
) -> AppResult<(StatusCode, Json<ProviderApplication>)> {
    let application = state
        .services
        .applications
        .submit(req.into_new_application())
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}
