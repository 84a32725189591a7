//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the hosted backend and the email transport.

mod application_service;
pub mod approval;
mod category_service;
pub mod notifications;
mod profile_service;

pub use application_service::ApplicationService;
pub use approval::{ApprovalOrchestrator, ApprovalResult};
pub use category_service::CategoryService;
pub use profile_service::{CUSTOMER_ROLE, ProfileDetails, ProfileService};

use std::sync::Arc;

use crate::config::Settings;
use crate::external::backend::{IdentityStore, RowStore};
use crate::repositories::Repositories;
use approval::{
    ApplicationLocks, CategoryLinker, IdentityResolver, NotificationDispatcher, ProfileMaterializer,
};
use notifications::EmailProvider;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap: every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub approvals: ApprovalOrchestrator,
    pub applications: ApplicationService,
    pub profiles: ProfileService,
    pub categories: CategoryService,
}

impl Services {
    /// Wires every service from the three external collaborators.
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        rows: Arc<dyn RowStore>,
        email: Arc<dyn EmailProvider>,
        settings: &Settings,
    ) -> Self {
        let repos = Repositories::new(rows);
        let locks = ApplicationLocks::new();

        let approvals = ApprovalOrchestrator::new(
            repos.applications.clone(),
            IdentityResolver::new(
                identity,
                settings.backend.identity_page_size,
                settings.approval.temporary_password_length,
            ),
            ProfileMaterializer::new(
                repos.customers.clone(),
                repos.providers.clone(),
                settings.approval.default_hourly_rate,
            ),
            CategoryLinker::new(repos.categories.clone()),
            NotificationDispatcher::new(email, settings.approval.login_url.clone()),
            locks.clone(),
        );

        Self {
            approvals,
            applications: ApplicationService::new(repos.applications, locks),
            profiles: ProfileService::new(repos.customers),
            categories: CategoryService::new(repos.categories),
        }
    }
}
