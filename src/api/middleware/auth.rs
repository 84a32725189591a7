//! Bearer token authentication middleware.
//!
//! Tokens are the hosted backend's access tokens; the subject is the
//! identity ID.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated caller, added to request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub claims: Claims,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            claims,
        }
    }
}

/// Validates `Authorization: Bearer <token>` and stores the [`AuthUser`].
///
/// # Errors
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token is invalid or expired.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })?;

    let claims = validate_access_token(token, &state.auth.jwt_secret)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Lets the request through only when the caller holds the admin role.
///
/// Must run after [`auth_middleware`].
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized {
            message: "Authentication required".to_string(),
        })?;

    if !user.claims.has_role(&state.auth.admin_role) {
        tracing::warn!(user_id = %user.id, "Admin route denied");
        return Err(AppError::Forbidden {
            message: "Admin role required".to_string(),
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{TestApp, bearer};
    use axum::{Extension, Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthUser>) -> String {
        user.id.to_string()
    }

    fn app(test: &TestApp) -> Router {
        let state = test.state.clone();
        let admin = Router::new()
            .route("/admin", get(whoami))
            .layer(middleware::from_fn_with_state(state.clone(), require_admin));

        Router::new()
            .route("/me", get(whoami))
            .merge(admin)
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn call(router: Router, uri: &str, authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_exposes_subject() {
        let test = TestApp::new();
        let user = Uuid::new_v4();

        let (status, body) = call(app(&test), "/me", Some(bearer(&test, user, None))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user.to_string());
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        let test = TestApp::new();

        let (status, _) = call(app(&test), "/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(app(&test), "/me", Some("Token abc".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_foreign_signature_is_unauthorized() {
        let test = TestApp::new();
        let claims = crate::utils::jwt::test_claims(Uuid::new_v4(), None, 60);
        let token = crate::utils::jwt::sign_for_test(&claims, "another-secret-that-is-long-enough!!");

        let (status, _) = call(app(&test), "/me", Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_route_requires_role() {
        let test = TestApp::new();
        let user = Uuid::new_v4();

        let (status, _) = call(app(&test), "/admin", Some(bearer(&test, user, None))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) =
            call(app(&test), "/admin", Some(bearer(&test, user, Some("admin")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user.to_string());
    }
}
