//! HTTP server lifecycle.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::create_router;
use crate::config::Settings;
use crate::state::AppState;

pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Builds the collaborators, binds, and serves until Ctrl+C or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        let Settings {
            application,
            server,
            backend,
            email,
            approval,
            ..
        } = &self.settings;

        // Secrets (service key, email key, jwt secret) stay out of the logs.
        tracing::info!(
            app = %application.name,
            version = %application.version,
            backend_url = %backend.url,
            identity_page_size = backend.identity_page_size,
            email_enabled = email.enabled,
            default_hourly_rate = approval.default_hourly_rate,
            "Starting Domify"
        );

        let state = AppState::from_settings(&self.settings)?;
        let router = create_router(state, Duration::from_secs(server.request_timeout));

        let address = server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind");
            anyhow::anyhow!("failed to bind {address}: {e}")
        })?;
        tracing::info!(
            address = %address,
            request_timeout_secs = server.request_timeout,
            "Server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
