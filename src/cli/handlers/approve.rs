//! Approve command handler
//!
//! Runs the approval workflow for one application outside the HTTP server,
//! against the same backend the server would use.

use tracing::info;

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::services::ApprovalResult;
use crate::state::AppState;

pub struct ApproveCommandHandler {
    config: Settings,
}

impl ApproveCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Approves application `id` and prints the outcome as JSON.
    pub async fn execute(&self, id: i64) -> AppResult<()> {
        let state = AppState::from_settings(&self.config)?;
        let result = state.services.approvals.approve(id).await?;

        info!(
            application_id = id,
            already_approved = result.already_approved,
            warnings = result.warnings.len(),
            "Approval finished"
        );
        println!("{}", render(&result)?);
        Ok(())
    }
}

fn render(result: &ApprovalResult) -> AppResult<String> {
    serde_json::to_string_pretty(result).map_err(|e| AppError::Internal { source: e.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::approval::TemporaryCredential;

    #[test]
    fn test_render_includes_credential_once() {
        let result = ApprovalResult {
            application_id: 7,
            identity_id: None,
            provider_profile_id: None,
            customer_profile_id: None,
            categories_linked: 2,
            email_sent: false,
            temporary_credential: Some(TemporaryCredential::generate(12)),
            already_approved: false,
            warnings: vec!["email not delivered".to_string()],
        };

        let rendered = render(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["application_id"], 7);
        assert_eq!(value["categories_linked"], 2);
        assert_eq!(
            value["temporary_credential"].as_str().map(str::len),
            Some(12)
        );
    }
}
