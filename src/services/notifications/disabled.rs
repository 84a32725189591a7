use async_trait::async_trait;
use tracing::info;

use super::provider::{EmailMessage, EmailProvider, EmailResult};
use crate::error::AppResult;

/// Used when email delivery is turned off; every send reports failure so
/// callers surface `email_sent: false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEmailProvider;

#[async_trait]
impl EmailProvider for DisabledEmailProvider {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailResult> {
        info!(to = %message.to, subject = %message.subject, "Email delivery disabled, message not sent");
        Ok(EmailResult::failed(None, 0))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
