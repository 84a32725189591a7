//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AuthConfig, Settings};
use crate::error::AppResult;
use crate::external::backend::{HttpIdentityStore, HttpRowStore};
use crate::external::client::build_http_client;
use crate::services::Services;
use crate::services::notifications::email_provider_from_config;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since every service holds its collaborators in `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Token verification settings
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(services: Services, auth: AuthConfig) -> Self {
        Self { services, auth }
    }

    /// Builds the HTTP collaborators from settings and wires every service.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let backend_client =
            build_http_client(Duration::from_secs(settings.backend.request_timeout))?;
        let email_client = build_http_client(Duration::from_secs(settings.email.timeout_seconds))?;

        let identity = Arc::new(HttpIdentityStore::new(
            backend_client.clone(),
            &settings.backend,
        ));
        let rows = Arc::new(HttpRowStore::new(backend_client, &settings.backend));
        let email = email_provider_from_config(email_client, &settings.email);

        let services = Services::new(identity, rows, email, settings);
        Ok(Self::new(services, settings.auth.clone()))
    }
}
