//! Email provider abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// A rendered email ready to send.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

// Bodies can carry a temporary password, so only addressing is printed.
impl std::fmt::Debug for EmailMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailMessage")
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Outcome of a send attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailResult {
    pub success: bool,
    pub message_id: Option<String>,
    /// HTTP status, when the transport got one
    pub status_code: Option<u16>,
    pub duration_ms: u64,
}

impl EmailResult {
    pub fn failed(status_code: Option<u16>, duration_ms: u64) -> Self {
        Self {
            success: false,
            message_id: None,
            status_code,
            duration_ms,
        }
    }
}

/// Trait for email transports.
///
/// Delivery failures are reported through `EmailResult::success`; an `Err`
/// is reserved for problems building the request.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailResult>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
