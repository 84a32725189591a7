use std::time::Duration;

use anyhow::Context;

use crate::error::AppResult;

/// Builds the shared HTTP client used by backend and email clients.
///
/// One client is created per process and cloned into each consumer so they
/// share the connection pool.
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .user_agent(format!("domify/{}", crate::pkg_version()))
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}
