//! Customer and provider profile repositories.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use super::rows::Rows;
use crate::error::{AppError, AppResult};
use crate::external::backend::{Query, RowStore};
use crate::models::{
    CUSTOMERS_TABLE, CustomerProfile, NewCustomerProfile, NewProviderProfile,
    PROVIDER_PROFILES_TABLE, ProviderProfile,
};

#[derive(Clone)]
pub struct CustomerRepository {
    rows: Rows,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            rows: Rows::new(store, CUSTOMERS_TABLE),
        }
    }

    /// The identity's customer profile, ignoring soft-deleted rows.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<CustomerProfile>> {
        let query = Query::new().eq("user_id", user_id).is_null("deleted_at");
        self.rows.maybe_single(&query).await
    }

    pub async fn create(&self, new: &NewCustomerProfile) -> AppResult<CustomerProfile> {
        self.rows.insert(new).await
    }
}

#[derive(Clone)]
pub struct ProviderProfileRepository {
    rows: Rows,
}

impl ProviderProfileRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            rows: Rows::new(store, PROVIDER_PROFILES_TABLE),
        }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<ProviderProfile>> {
        self.rows
            .maybe_single(&Query::new().eq("user_id", user_id))
            .await
    }

    pub async fn create(&self, new: &NewProviderProfile) -> AppResult<ProviderProfile> {
        self.rows.insert(new).await
    }

    /// Marks the profile active. Fails with `NotFound` when no row has `id`.
    pub async fn activate(&self, id: Uuid) -> AppResult<ProviderProfile> {
        self.rows
            .update::<ProviderProfile>(&Query::new().eq("id", id), json!({ "is_active": true }))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(PROVIDER_PROFILES_TABLE, "id", id))
    }
}
