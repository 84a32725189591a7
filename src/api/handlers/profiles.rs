//! Customer profile self-service for the authenticated caller.

use axum::{Extension, Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PROFILE_TAG;
use crate::api::dto::{CreateProfileRequest, ErrorResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::CustomerProfile;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn profile_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(ensure_profile))
}

/// POST /api/profiles - Create the caller's customer profile if absent
///
/// Returns 201 with a new profile, or 200 with the one that already exists.
#[utoipa::path(
    post,
    path = "/",
    tag = PROFILE_TAG,
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = CustomerProfile),
        (status = 200, description = "Profile already existed", body = CustomerProfile),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn ensure_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateProfileRequest>,
) -> AppResult<(StatusCode, Json<CustomerProfile>)> {
    let (profile, created) = state
        .services
        .profiles
        .ensure_customer_profile(user.id, &req.into())
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(profile)))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{TestApp, bearer};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_profile_is_created_once() {
        let app = TestApp::new();
        let user = Uuid::new_v4();
        let token = bearer(&app, user, None);
        let body = json!({ "first_name": "Ana", "last_name": "Gómez" });

        let (status, created) = app
            .send(Method::POST, "/api/profiles", Some(&token), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["user_id"], user.to_string());
        assert_eq!(created["role"], "customer");

        let (status, existing) = app
            .send(Method::POST, "/api/profiles", Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(existing["id"], created["id"]);
        assert_eq!(app.rows.rows("customers").len(), 1);
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/profiles",
                None,
                Some(json!({ "first_name": "Ana", "last_name": "Gómez" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
