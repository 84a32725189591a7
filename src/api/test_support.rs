//! Router-level test harness over the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::validation::valid_settings;
use crate::external::backend::memory::{MemoryIdentityStore, MemoryRowStore};
use crate::services::Services;
use crate::services::notifications::memory::RecordingEmailProvider;
use crate::state::AppState;
use crate::utils::jwt::{sign_for_test, test_claims};

pub(crate) struct TestApp {
    pub state: AppState,
    pub identity: Arc<MemoryIdentityStore>,
    pub rows: Arc<MemoryRowStore>,
    pub email: Arc<RecordingEmailProvider>,
}

impl TestApp {
    pub fn new() -> Self {
        let settings = valid_settings();
        let identity = Arc::new(MemoryIdentityStore::new());
        let rows = Arc::new(MemoryRowStore::new());
        let email = Arc::new(RecordingEmailProvider::new());
        let services = Services::new(identity.clone(), rows.clone(), email.clone(), &settings);

        Self {
            state: AppState::new(services, settings.auth),
            identity,
            rows,
            email,
        }
    }

    pub fn router(&self) -> Router {
        super::routes::create_router(self.state.clone(), Duration::from_secs(5))
    }

    /// Sends a request through the full router and decodes the JSON body
    /// (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

/// `Authorization` header value for `user`, optionally holding `role`.
pub(crate) fn bearer(app: &TestApp, user: Uuid, role: Option<&str>) -> String {
    let token = sign_for_test(&test_claims(user, role, 300), &app.state.auth.jwt_secret);
    format!("Bearer {token}")
}

pub(crate) fn admin_bearer(app: &TestApp) -> String {
    bearer(app, Uuid::new_v4(), Some("admin"))
}
