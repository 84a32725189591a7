//! Error handler for converting AppError to HTTP responses.
//!
//! Every error leaves the API as an [`ErrorResponse`]. Internal sources are
//! logged, never echoed to the client.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Error bodies larger than this are passed through untouched.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Downstream { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::new("NOT_FOUND", &format!("{entity} with {field}={value} not found")),
        AppError::Validation { field, reason } => {
            ErrorResponse::new("VALIDATION_ERROR", &format!("Validation failed for {field}: {reason}"))
                .with_details(json!({ "field": field, "reason": reason }))
        }
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                .with_details(json!({ "errors": errors }))
        }
        AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
        AppError::Conflict { message } => ErrorResponse::new("CONFLICT", message),
        AppError::Unauthorized { message } => ErrorResponse::new("UNAUTHORIZED", message),
        AppError::Forbidden { message } => ErrorResponse::new("FORBIDDEN", message),
        AppError::Downstream {
            service, operation, ..
        } => ErrorResponse::new(
            "DOWNSTREAM_ERROR",
            &format!("{service} call failed during {operation}"),
        )
        .with_details(json!({ "service": service, "operation": operation })),
        AppError::Configuration { key, .. } => {
            ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {key}"))
        }
        AppError::Internal { .. } => {
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            error!(error = ?self, "Request failed");
        }

        (status, Json(error_body(&self))).into_response()
    }
}

fn fallback_body(status: StatusCode, original: &str) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::SERVICE_UNAVAILABLE => ("SERVICE_UNAVAILABLE", "Service temporarily unavailable"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    // Server-side bodies may carry internals.
    if original.is_empty() || status.is_server_error() {
        ErrorResponse::new(code, default_message)
    } else {
        ErrorResponse::new(code, original)
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Brings every error response into the [`ErrorResponse`] shape and stamps
/// it with the request ID.
///
/// JSON error bodies produced by [`AppError`] get the `request_id` added;
/// plain-text bodies from the framework (unknown routes, wrong methods,
/// timeouts) are wrapped. Must run inside the request ID middleware.
pub async fn error_response_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let json = is_json(&response);
    let (mut parts, body) = response.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, MAX_ERROR_BODY).await else {
        return (status, Json(fallback_body(status, ""))).into_response();
    };

    let parsed = json
        .then(|| serde_json::from_slice::<ErrorResponse>(&bytes).ok())
        .flatten();
    let mut error_response = match parsed {
        Some(parsed) => parsed,
        // Some other JSON payload; leave it alone
        None if json => return Response::from_parts(parts, Body::from(bytes)),
        None => fallback_body(status, String::from_utf8_lossy(&bytes).trim()),
    };

    if let Some(id) = request_id {
        error_response = error_response.with_request_id(&id);
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let mut response = Json(error_response).into_response();
    *response.status_mut() = status;
    response.headers_mut().extend(parts.headers);
    response
}
