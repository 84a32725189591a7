//! Email notifications.
//!
//! `EmailProvider` abstracts the transport; templates render the provider
//! onboarding messages.

mod disabled;
mod http_provider;
#[cfg(test)]
pub mod memory;
mod provider;
pub mod templates;

pub use disabled::DisabledEmailProvider;
pub use http_provider::HttpEmailProvider;
pub use provider::{EmailMessage, EmailProvider, EmailResult};

use std::sync::Arc;

use crate::config::EmailConfig;

/// Picks the HTTP provider when email is enabled, otherwise the disabled one.
pub fn email_provider_from_config(
    client: reqwest::Client,
    config: &EmailConfig,
) -> Arc<dyn EmailProvider> {
    if config.enabled {
        Arc::new(HttpEmailProvider::new(client, config))
    } else {
        Arc::new(DisabledEmailProvider)
    }
}
