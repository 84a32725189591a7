//! Provider application approval workflow.
//!
//! `ApprovalOrchestrator` drives the stages in order: resolve the identity,
//! checkpoint it on the application, materialize both profiles, link
//! categories, commit the status and finally notify the applicant.

mod category_linker;
mod credential;
mod identity_resolver;
mod lock;
mod notification_dispatcher;
mod orchestrator;
mod profile_materializer;


pub use category_linker::{CategoryLinker, LinkOutcome};
pub use credential::TemporaryCredential;
pub use identity_resolver::{IdentityResolver, PROVIDER_ROLE, ResolvedIdentity};
pub use lock::{ApplicationLockGuard, ApplicationLocks};
pub use notification_dispatcher::NotificationDispatcher;
pub use orchestrator::{ApprovalOrchestrator, ApprovalResult};
pub use profile_materializer::{
    MaterializedProfiles, ProfileMaterializer, resolve_names, split_headline,
};
