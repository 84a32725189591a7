//! Provider application repository.

use std::sync::Arc;

use jiff::Timestamp;
use serde_json::{Value, json};
use uuid::Uuid;

use super::rows::Rows;
use crate::error::AppResult;
use crate::external::backend::{Query, RowStore};
use crate::models::{APPLICATIONS_TABLE, ApplicationStatus, NewApplication, ProviderApplication};

#[derive(Clone)]
pub struct ApplicationRepository {
    rows: Rows,
}

impl ApplicationRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            rows: Rows::new(store, APPLICATIONS_TABLE),
        }
    }

    pub async fn create(&self, new: &NewApplication) -> AppResult<ProviderApplication> {
        self.rows.insert(new).await
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<ProviderApplication>> {
        self.rows.maybe_single(&Query::new().eq("id", id)).await
    }

    /// Lists applications newest first, optionally restricted to one status.
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<ProviderApplication>> {
        let mut query = Query::new()
            .order_by("created_at", false)
            .limit(limit)
            .offset(offset);
        if let Some(status) = status {
            query = query.eq("status", status);
        }
        self.rows.select(&query).await
    }

    /// Records the identity resolved for the application.
    pub async fn set_user_id(&self, id: i64, user_id: Uuid) -> AppResult<()> {
        self.rows
            .update::<Value>(&Query::new().eq("id", id), json!({ "user_id": user_id }))
            .await?;
        Ok(())
    }

    /// Marks a submitted or in-review application approved.
    ///
    /// Returns `None` when another writer changed the status first.
    pub async fn mark_approved(
        &self,
        id: i64,
        reviewed_at: Timestamp,
    ) -> AppResult<Option<ProviderApplication>> {
        let patch = json!({
            "status": ApplicationStatus::Approved,
            "reviewed_at": reviewed_at,
        });
        self.transition(
            id,
            &[ApplicationStatus::Submitted, ApplicationStatus::InReview],
            patch,
        )
        .await
    }

    /// Applies `patch` only while the application is in one of `from`.
    ///
    /// Returns `None` when the status changed underneath the caller.
    pub async fn transition(
        &self,
        id: i64,
        from: &[ApplicationStatus],
        patch: Value,
    ) -> AppResult<Option<ProviderApplication>> {
        let query = Query::new().eq("id", id).in_list("status", from.iter());
        Ok(self.rows.update(&query, patch).await?.into_iter().next())
    }
}
