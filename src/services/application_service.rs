//! Submission and review of provider applications.

use jiff::Timestamp;
use serde_json::json;
use tracing::info;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::models::{ApplicationStatus, NewApplication, ProviderApplication};
use crate::repositories::ApplicationRepository;
use crate::services::approval::ApplicationLocks;

/// Review-side state changes other than approval.
///
/// Shares the approval locks so a review or rejection never interleaves with
/// an approval of the same application in this process.
#[derive(Clone)]
pub struct ApplicationService {
    applications: ApplicationRepository,
    locks: ApplicationLocks,
}

impl ApplicationService {
    pub fn new(applications: ApplicationRepository, locks: ApplicationLocks) -> Self {
        Self {
            applications,
            locks,
        }
    }

    /// Stores a new application in the `submitted` state.
    pub async fn submit(&self, mut new: NewApplication) -> AppResult<ProviderApplication> {
        new.email = new.email.trim().to_lowercase();
        if !new.email.validate_email() {
            return Err(AppError::validation("email", "Invalid email format"));
        }
        new.status = ApplicationStatus::Submitted;

        let created = self.applications.create(&new).await?;
        info!(application_id = created.id, "Provider application submitted");
        Ok(created)
    }

    /// Lists one page of applications, newest first.
    ///
    /// Fetches one row past the page so the caller can tell whether another
    /// page follows; the extra row is not returned.
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
        page: u32,
        page_size: u32,
    ) -> AppResult<(Vec<ProviderApplication>, bool)> {
        let page_size = page_size.max(1) as usize;
        let offset = (page.max(1) as usize - 1) * page_size;

        let mut rows = self
            .applications
            .list(status, page_size + 1, offset)
            .await?;
        let has_next = rows.len() > page_size;
        rows.truncate(page_size);
        Ok((rows, has_next))
    }

    pub async fn get(&self, id: i64) -> AppResult<ProviderApplication> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("provider_application", "id", id))
    }

    /// Moves a submitted application into review. Already in review is a
    /// no-op; terminal states are a conflict.
    pub async fn review(&self, id: i64) -> AppResult<ProviderApplication> {
        let _guard = self.locks.acquire(id).await;
        let current = self.get(id).await?;

        match current.status {
            ApplicationStatus::InReview => Ok(current),
            ApplicationStatus::Submitted => {
                let updated = self
                    .applications
                    .transition(
                        id,
                        &[ApplicationStatus::Submitted],
                        json!({ "status": ApplicationStatus::InReview }),
                    )
                    .await?;
                match updated {
                    Some(updated) => {
                        info!(application_id = id, "Application moved to review");
                        Ok(updated)
                    }
                    None => Err(changed_underneath(id)),
                }
            }
            status => Err(AppError::Conflict {
                message: format!("application {id} is {status} and cannot be reviewed"),
            }),
        }
    }

    /// Rejects an application, recording the reason.
    ///
    /// Rejecting a rejected application is a no-op. An approved one is only
    /// rejected when `force` is set; its identity and profiles are left in
    /// place.
    pub async fn reject(
        &self,
        id: i64,
        reason: Option<String>,
        force: bool,
    ) -> AppResult<ProviderApplication> {
        let _guard = self.locks.acquire(id).await;
        let current = self.get(id).await?;

        let from: &[ApplicationStatus] = match current.status {
            ApplicationStatus::Rejected => return Ok(current),
            ApplicationStatus::Approved if !force => {
                return Err(AppError::Conflict {
                    message: format!("application {id} is already approved"),
                });
            }
            ApplicationStatus::Approved => &[ApplicationStatus::Approved],
            ApplicationStatus::Submitted | ApplicationStatus::InReview => {
                &[ApplicationStatus::Submitted, ApplicationStatus::InReview]
            }
        };

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let patch = json!({
            "status": ApplicationStatus::Rejected,
            "rejection_reason": reason,
            "reviewed_at": Timestamp::now(),
        });

        match self.applications.transition(id, from, patch).await? {
            Some(updated) => {
                info!(
                    application_id = id,
                    previous = %current.status,
                    forced = force,
                    "Application rejected"
                );
                Ok(updated)
            }
            None => Err(changed_underneath(id)),
        }
    }
}

fn changed_underneath(id: i64) -> AppError {
    AppError::Conflict {
        message: format!("application {id} changed status concurrently, reload and retry"),
    }
}
