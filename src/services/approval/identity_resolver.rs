//! Finds or creates the identity behind an application email.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::credential::TemporaryCredential;
use crate::error::AppResult;
use crate::external::backend::IdentityStore;
use crate::models::{Identity, NewIdentity};
use crate::services::CUSTOMER_ROLE;

pub const PROVIDER_ROLE: &str = "provider";

/// Set on every identity that owns a provider profile, whatever its role.
pub const PROVIDER_FLAG: &str = "is_provider";

/// Result of resolving an email to an identity.
#[derive(Debug)]
pub struct ResolvedIdentity {
    pub identity_id: Uuid,
    pub is_new: bool,
    /// Role the identity carried before this call
    pub role: Option<String>,
    /// Present when this call set the password, either on creation or by
    /// reissuing one that was never used
    pub credential: Option<TemporaryCredential>,
}

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
    page_size: u32,
    password_length: usize,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>, page_size: u32, password_length: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
            password_length,
        }
    }

    /// Scans the identity list page by page for `email`.
    ///
    /// The admin API has no email filter, so this is linear in the number of
    /// identities.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        let mut page = 1;
        loop {
            let identities = self.store.list_identities(page, self.page_size).await?;
            let exhausted = identities.len() < self.page_size as usize;

            if let Some(found) = identities.into_iter().find(|i| i.has_email(email)) {
                debug!(page, identity_id = %found.id, "Found existing identity");
                return Ok(Some(found));
            }
            if exhausted {
                return Ok(None);
            }
            page += 1;
        }
    }

    /// Returns the identity for `email`, creating it with a temporary
    /// password when none exists.
    ///
    /// Re-running after a crash finds the identity created by the earlier
    /// attempt instead of creating another one.
    pub async fn resolve(&self, email: &str) -> AppResult<ResolvedIdentity> {
        if let Some(existing) = self.find_by_email(email).await? {
            let credential = self.reissue_if_unused(&existing).await;
            return Ok(ResolvedIdentity {
                identity_id: existing.id,
                is_new: false,
                role: existing.role().map(str::to_string),
                credential,
            });
        }

        let credential = TemporaryCredential::generate(self.password_length);
        let new = NewIdentity {
            email: email.trim().to_string(),
            password: credential.expose().to_string(),
            email_confirm: true,
            user_metadata: provider_metadata(true),
        };

        match self.store.create_identity(&new).await {
            Ok(identity) => {
                info!(identity_id = %identity.id, "Created provider identity");
                Ok(ResolvedIdentity {
                    identity_id: identity.id,
                    is_new: true,
                    role: None,
                    credential: Some(credential),
                })
            }
            Err(err) => {
                // Another writer may have created the account between the
                // scan and the create.
                if let Some(existing) = self.find_by_email(email).await? {
                    warn!(identity_id = %existing.id, "Identity appeared during creation, using it");
                    return Ok(ResolvedIdentity {
                        identity_id: existing.id,
                        is_new: false,
                        role: existing.role().map(str::to_string),
                        credential: None,
                    });
                }
                Err(err)
            }
        }
    }

    /// An account still flagged `requires_password_change` has never used
    /// its generated password, which may never have been delivered. Give it
    /// a fresh one so the welcome email can carry it.
    async fn reissue_if_unused(&self, identity: &Identity) -> Option<TemporaryCredential> {
        if !identity.requires_password_change() {
            return None;
        }

        let credential = TemporaryCredential::generate(self.password_length);
        match self.store.set_password(identity.id, credential.expose()).await {
            Ok(()) => {
                info!(identity_id = %identity.id, "Issued a new temporary password");
                Some(credential)
            }
            Err(err) => {
                warn!(identity_id = %identity.id, error = %err, "Could not issue a new temporary password");
                None
            }
        }
    }

    /// Marks an existing identity as a provider.
    ///
    /// Only an identity without a role, or with the customer role, takes the
    /// provider role. Any other role is kept and only the provider flag is set.
    pub async fn promote_to_provider(
        &self,
        identity_id: Uuid,
        current_role: Option<&str>,
    ) -> AppResult<()> {
        let metadata = match current_role {
            None | Some(CUSTOMER_ROLE) | Some(PROVIDER_ROLE) => provider_metadata(false),
            Some(role) => {
                debug!(%identity_id, role, "Keeping existing role");
                provider_flag()
            }
        };
        self.store
            .update_identity_metadata(identity_id, metadata)
            .await
    }
}

fn provider_flag() -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert(PROVIDER_FLAG.to_string(), json!(true));
    metadata
}

fn provider_metadata(requires_password_change: bool) -> Map<String, Value> {
    let mut metadata = provider_flag();
    metadata.insert("role".to_string(), json!(PROVIDER_ROLE));
    if requires_password_change {
        metadata.insert("requires_password_change".to_string(), json!(true));
    }
    metadata
}
