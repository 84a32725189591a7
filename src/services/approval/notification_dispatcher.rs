//! Sends the onboarding email once an application is approved.

use std::sync::Arc;

use tracing::{info, warn};

use super::credential::TemporaryCredential;
use crate::services::notifications::{EmailProvider, templates};

#[derive(Clone)]
pub struct NotificationDispatcher {
    provider: Arc<dyn EmailProvider>,
    login_url: String,
}

impl NotificationDispatcher {
    pub fn new(provider: Arc<dyn EmailProvider>, login_url: impl Into<String>) -> Self {
        Self {
            provider,
            login_url: login_url.into(),
        }
    }

    /// Sends the welcome email when a credential was issued, or the
    /// "profile activated" notice for an existing account.
    ///
    /// Returns whether the message was delivered; failures are logged only.
    pub async fn notify(
        &self,
        email: &str,
        display_name: &str,
        credential: Option<&TemporaryCredential>,
    ) -> bool {
        let message = match credential {
            Some(credential) => {
                templates::welcome(email, display_name, credential.expose(), &self.login_url)
            }
            None => templates::profile_activated(email, display_name, &self.login_url),
        };

        match self.provider.send(&message).await {
            Ok(result) if result.success => {
                info!(
                    provider = self.provider.name(),
                    message_id = result.message_id.as_deref().unwrap_or("-"),
                    duration_ms = result.duration_ms,
                    "Onboarding email sent"
                );
                true
            }
            Ok(result) => {
                warn!(
                    provider = self.provider.name(),
                    status_code = result.status_code,
                    "Onboarding email not delivered"
                );
                false
            }
            Err(err) => {
                warn!(provider = self.provider.name(), error = %err, "Onboarding email failed");
                false
            }
        }
    }
}
