//! Transactional email over an HTTP JSON API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::provider::{EmailMessage, EmailProvider, EmailResult};
use crate::config::EmailConfig;
use crate::error::AppResult;

/// Posts `{from, to, subject, html, text}` to the configured endpoint with a
/// bearer API key and reads back `{id}`.
pub struct HttpEmailProvider {
    client: Client,
    api_url: String,
    api_key: String,
    from_address: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
}

impl HttpEmailProvider {
    pub fn new(client: Client, config: &EmailConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl EmailProvider for HttpEmailProvider {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailResult> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from_address,
                "to": [message.to],
                "subject": message.subject,
                "html": message.html,
                "text": message.text,
            }))
            .send()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let status_code = resp.status().as_u16();
                let message_id = resp
                    .json::<SendResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.id);
                Ok(EmailResult {
                    success: true,
                    message_id,
                    status_code: Some(status_code),
                    duration_ms,
                })
            }
            Ok(resp) => {
                let status_code = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                warn!(status_code, body = %body.trim(), "Email API rejected message");
                Ok(EmailResult::failed(Some(status_code), duration_ms))
            }
            Err(e) => {
                warn!(error = %e, "Email API request failed");
                Ok(EmailResult::failed(None, duration_ms))
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
