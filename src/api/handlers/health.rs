//! Health check endpoint handlers.
//!
//! Readiness is judged by a cheap select against the row store; the
//! identity store and email transport are not probed.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Row store round trips slower than this report `degraded`.
const DEGRADED_AFTER_MS: u64 = 1_000;

/// # Routes
/// - `GET /health` - Basic health check
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Health report with per-component checks.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("row_store".to_string(), check_row_store(&state).await);

    let report =
        HealthResponse::from_checks(crate::pkg_version(), Timestamp::now().to_string(), checks);
    (report.status.http_status(), Json(report))
}

/// Readiness probe endpoint.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    check_row_store(&state).await.status.http_status()
}

/// Liveness probe endpoint. Does not touch dependencies.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_row_store(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let result = state.services.categories.ping().await;
    let elapsed = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) if elapsed > DEGRADED_AFTER_MS => {
            ComponentHealth::new(HealthStatus::Degraded, "Slow response", elapsed)
        }
        Ok(()) => ComponentHealth::new(HealthStatus::Healthy, "Reachable", elapsed),
        Err(e) => {
            tracing::warn!(error = %e, "Row store health check failed");
            ComponentHealth::new(HealthStatus::Unhealthy, "Row store unreachable", elapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::TestApp;
    use crate::external::backend::memory::Op;
    use axum::http::Method;

    #[tokio::test]
    async fn test_liveness_check() {
        assert_eq!(liveness_check().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_row_store() {
        let app = TestApp::new();

        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"]["row_store"]["status"], "healthy");

        let (status, _) = app.send(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreachable_row_store_is_unhealthy() {
        let app = TestApp::new();
        app.rows.fail("categories", Op::Select);

        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");

        let (status, _) = app.send(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = app.send(Method::GET, "/health/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
