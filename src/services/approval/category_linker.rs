//! Copies an application's categories onto the provider profile.

use tracing::warn;
use uuid::Uuid;

use crate::models::CategoryLink;
use crate::repositories::CategoryRepository;

/// What the linker managed to do. Linking is best-effort and never fails
/// the approval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Requested categories now linked to the provider, including links
    /// that already existed
    pub linked: usize,
    /// Categories that could not be linked
    pub failed: Vec<i64>,
}

#[derive(Clone)]
pub struct CategoryLinker {
    categories: CategoryRepository,
}

impl CategoryLinker {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    /// Links `category_ids` to the provider, skipping links that already
    /// exist. A failed bulk insert falls back to inserting one by one.
    pub async fn link(&self, provider_id: Uuid, category_ids: &[i64]) -> LinkOutcome {
        if category_ids.is_empty() {
            return LinkOutcome::default();
        }

        let existing = match self.categories.linked_category_ids(provider_id).await {
            Ok(existing) => existing,
            Err(err) => {
                warn!(%provider_id, error = %err, "Could not read existing category links");
                Vec::new()
            }
        };

        let mut outcome = LinkOutcome {
            linked: category_ids.iter().filter(|id| existing.contains(id)).count(),
            failed: Vec::new(),
        };

        let missing: Vec<CategoryLink> = category_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .map(|&category_id| CategoryLink {
                provider_id,
                category_id,
            })
            .collect();
        if missing.is_empty() {
            return outcome;
        }

        match self.categories.link_many(&missing).await {
            Ok(inserted) => {
                outcome.linked += inserted;
                return outcome;
            }
            Err(err) => {
                warn!(
                    %provider_id,
                    count = missing.len(),
                    error = %err,
                    "Bulk category link failed, linking one by one"
                );
            }
        }

        for link in &missing {
            match self.categories.link_one(link).await {
                Ok(()) => outcome.linked += 1,
                Err(err) => {
                    warn!(
                        %provider_id,
                        category_id = link.category_id,
                        error = %err,
                        "Category link failed"
                    );
                    outcome.failed.push(link.category_id);
                }
            }
        }
        outcome
    }
}
