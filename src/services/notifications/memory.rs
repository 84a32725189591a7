//! Recording email provider for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::provider::{EmailMessage, EmailProvider, EmailResult};
use crate::error::AppResult;

#[derive(Default)]
pub struct RecordingEmailProvider {
    sent: Mutex<Vec<EmailMessage>>,
    /// When set, sends are recorded but report failure
    pub fail: AtomicBool,
}

impl RecordingEmailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let provider = Self::default();
        provider.fail.store(true, Ordering::SeqCst);
        provider
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailResult> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Ok(EmailResult::failed(Some(500), 1));
        }
        Ok(EmailResult {
            success: true,
            message_id: Some(format!("msg_{}", self.sent.lock().unwrap().len())),
            status_code: Some(200),
            duration_ms: 1,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
