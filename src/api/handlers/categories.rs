//! Service category catalogue.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATEGORY_TAG;
use crate::error::AppResult;
use crate::models::Category;
use crate::state::AppState;

pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_categories))
}

/// GET /api/categories - Active categories ordered by name
#[utoipa::path(
    get,
    path = "/",
    tag = CATEGORY_TAG,
    responses(
        (status = 200, description = "Active categories", body = Vec<Category>)
    )
)]
async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.services.categories.list_active().await?))
}
