//! Health report returned by `GET /health`.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2026-01-01T12:00:00Z",
    "checks": {
        "row_store": { "status": "healthy", "message": "Reachable", "response_time_ms": 5 }
    }
}))]
pub struct HealthResponse {
    /// Worst status across `checks`
    pub status: HealthStatus,
    pub version: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Keyed by collaborator name
    pub checks: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Builds a report whose overall status is the worst component status.
    /// An empty report is healthy.
    pub fn from_checks(
        version: impl Into<String>,
        timestamp: impl Into<String>,
        checks: BTreeMap<String, ComponentHealth>,
    ) -> Self {
        let status = checks
            .values()
            .map(|check| check.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);
        Self {
            status,
            version: version.into(),
            timestamp: timestamp.into(),
            checks,
        }
    }
}

/// Ordered from best to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Reachable but slow
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Degraded still serves traffic.
    pub fn http_status(self) -> StatusCode {
        match self {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    pub fn new(status: HealthStatus, message: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status,
            message: Some(message.into()),
            response_time_ms: Some(response_time_ms),
        }
    }
}
