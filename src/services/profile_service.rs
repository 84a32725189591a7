//! Customer profile self-service.

use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CustomerProfile, NewCustomerProfile};
use crate::repositories::CustomerRepository;
use crate::utils::retry::{RetryPolicy, retry_with_backoff};

pub const CUSTOMER_ROLE: &str = "customer";

/// Names and phone supplied by the user for their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    customers: CustomerRepository,
    retry: RetryPolicy,
}

impl ProfileService {
    pub fn new(customers: CustomerRepository) -> Self {
        Self {
            customers,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the caller's customer profile, creating it when absent.
    ///
    /// The boolean is true when this call created the row. Each attempt
    /// looks the profile up again before inserting, so a retry after a
    /// write that timed out but landed does not create a second row.
    pub async fn ensure_customer_profile(
        &self,
        user_id: Uuid,
        details: &ProfileDetails,
    ) -> AppResult<(CustomerProfile, bool)> {
        retry_with_backoff(self.retry, "ensure_customer_profile", || async move {
            if let Some(existing) = self.customers.find_active_by_user(user_id).await? {
                return Ok((existing, false));
            }

            let created = self
                .customers
                .create(&NewCustomerProfile {
                    user_id,
                    first_name: details.first_name.trim().to_string(),
                    last_name: details.last_name.trim().to_string(),
                    phone_number: details.phone_number.clone(),
                    role: CUSTOMER_ROLE.to_string(),
                })
                .await?;
            info!(%user_id, customer_profile_id = %created.id, "Created customer profile");
            Ok((created, true))
        })
        .await
    }
}
