//! Approval state machine tying the workflow stages together.

use jiff::Timestamp;
use serde::Serialize;
use tracing::{Instrument, error, info, info_span, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

use super::category_linker::CategoryLinker;
use super::credential::TemporaryCredential;
use super::identity_resolver::IdentityResolver;
use super::lock::ApplicationLocks;
use super::notification_dispatcher::NotificationDispatcher;
use super::profile_materializer::ProfileMaterializer;
use crate::error::{AppError, AppResult};
use crate::models::{ApplicationStatus, ProviderApplication};
use crate::repositories::ApplicationRepository;

/// Structured outcome of an approval.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResult {
    pub application_id: i64,
    pub identity_id: Option<Uuid>,
    pub provider_profile_id: Option<Uuid>,
    pub customer_profile_id: Option<Uuid>,
    pub categories_linked: usize,
    pub email_sent: bool,
    /// Returned once so it can be relayed by hand if the email was lost
    #[schema(value_type = Option<String>)]
    pub temporary_credential: Option<TemporaryCredential>,
    /// True when the application was already approved and nothing ran
    pub already_approved: bool,
    /// Non-fatal problems: unlinked categories, undelivered email
    pub warnings: Vec<String>,
}

impl ApprovalResult {
    fn no_op(
        application: &ProviderApplication,
        customer_profile_id: Option<Uuid>,
        provider_profile_id: Option<Uuid>,
    ) -> Self {
        Self {
            application_id: application.id,
            identity_id: application.user_id,
            provider_profile_id,
            customer_profile_id,
            categories_linked: 0,
            email_sent: false,
            temporary_credential: None,
            already_approved: true,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Identity,
    Checkpoint,
    Profiles,
    Status,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Stage::Identity => "identity",
            Stage::Checkpoint => "checkpoint",
            Stage::Profiles => "profiles",
            Stage::Status => "status",
        }
    }
}

/// Runs the approval of one application end to end.
///
/// Every stage before the status commit is idempotent, so a failed attempt
/// can be retried and resumes where the previous one stopped.
#[derive(Clone)]
pub struct ApprovalOrchestrator {
    applications: ApplicationRepository,
    resolver: IdentityResolver,
    materializer: ProfileMaterializer,
    linker: CategoryLinker,
    dispatcher: NotificationDispatcher,
    locks: ApplicationLocks,
}

impl ApprovalOrchestrator {
    pub fn new(
        applications: ApplicationRepository,
        resolver: IdentityResolver,
        materializer: ProfileMaterializer,
        linker: CategoryLinker,
        dispatcher: NotificationDispatcher,
        locks: ApplicationLocks,
    ) -> Self {
        Self {
            applications,
            resolver,
            materializer,
            linker,
            dispatcher,
            locks,
        }
    }

    pub async fn approve(&self, application_id: i64) -> AppResult<ApprovalResult> {
        let span = info_span!("approve_application", application_id);
        async {
            let _guard = self.locks.acquire(application_id).await;
            self.run(application_id).await
        }
        .instrument(span)
        .await
    }

    async fn run(&self, application_id: i64) -> AppResult<ApprovalResult> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::not_found("provider_application", "id", application_id))?;

        match application.status {
            ApplicationStatus::Approved => {
                info!("Application already approved, nothing to do");
                let (customer, provider) = match application.user_id {
                    Some(identity_id) => self.materializer.existing(identity_id).await?,
                    None => (None, None),
                };
                return Ok(ApprovalResult::no_op(&application, customer, provider));
            }
            ApplicationStatus::Rejected => {
                return Err(AppError::Conflict {
                    message: format!("application {application_id} was rejected"),
                });
            }
            ApplicationStatus::Submitted | ApplicationStatus::InReview => {}
        }

        let email = application.email.trim().to_string();
        if email.is_empty() || !email.validate_email() {
            return Err(AppError::validation(
                "email",
                format!("application {application_id} has no valid email"),
            ));
        }

        let mut warnings = Vec::new();

        let resolved = self
            .resolver
            .resolve(&email)
            .await
            .map_err(|e| stage_failed(Stage::Identity, application_id, &email, e))?;
        let identity_id = resolved.identity_id;

        if !resolved.is_new
            && let Err(err) = self
                .resolver
                .promote_to_provider(identity_id, resolved.role.as_deref())
                .await
        {
            warn!(%identity_id, error = %err, "Could not tag existing identity as provider");
            warnings.push("existing account could not be tagged with the provider role".into());
        }

        if application.user_id != Some(identity_id) {
            if let Some(previous) = application.user_id {
                warn!(%previous, %identity_id, "Application linked to a different identity, relinking");
            }
            self.applications
                .set_user_id(application_id, identity_id)
                .await
                .map_err(|e| stage_failed(Stage::Checkpoint, application_id, &email, e))?;
        }

        let profiles = self
            .materializer
            .materialize(identity_id, &application)
            .await
            .map_err(|e| stage_failed(Stage::Profiles, application_id, &email, e))?;

        let category_ids = &application.application_data.category_ids;
        let links = self
            .linker
            .link(profiles.provider_profile_id, category_ids)
            .await;
        if !links.failed.is_empty() {
            warnings.push(format!(
                "{} of {} categories could not be linked: {:?}",
                links.failed.len(),
                category_ids.len(),
                links.failed
            ));
        }

        let committed = self
            .applications
            .mark_approved(application_id, Timestamp::now())
            .await
            .map_err(|e| stage_failed(Stage::Status, application_id, &email, e))?;

        let mut result = ApprovalResult {
            application_id,
            identity_id: Some(identity_id),
            provider_profile_id: Some(profiles.provider_profile_id),
            customer_profile_id: Some(profiles.customer_profile_id),
            categories_linked: links.linked,
            email_sent: false,
            temporary_credential: None,
            already_approved: false,
            warnings,
        };

        if committed.is_none() {
            // Another process changed the status between our read and the commit.
            let current = self.applications.find_by_id(application_id).await?;
            if current.is_some_and(|app| app.status == ApplicationStatus::Rejected) {
                return Err(AppError::Conflict {
                    message: format!("application {application_id} was rejected during approval"),
                });
            }
            result.already_approved = true;
            // A password set by this attempt supersedes whatever the other
            // writer mailed out, so it still has to reach the applicant.
            if resolved.credential.is_none() {
                info!("Application approved concurrently, skipping notification");
                return Ok(result);
            }
            warn!("Application approved concurrently after a password was issued");
        }

        result.email_sent = self
            .dispatcher
            .notify(
                &email,
                &application.display_name(),
                resolved.credential.as_ref(),
            )
            .await;
        if !result.email_sent {
            result
                .warnings
                .push("onboarding email was not delivered".to_string());
        }
        result.temporary_credential = resolved.credential;

        info!(
            %identity_id,
            provider_profile_id = %profiles.provider_profile_id,
            categories_linked = result.categories_linked,
            email_sent = result.email_sent,
            new_identity = resolved.is_new,
            "Application approved"
        );
        Ok(result)
    }
}

fn stage_failed(stage: Stage, application_id: i64, email: &str, err: AppError) -> AppError {
    error!(
        application_id,
        email,
        stage = stage.as_str(),
        error = %err,
        "Approval stage failed"
    );
    err
}
