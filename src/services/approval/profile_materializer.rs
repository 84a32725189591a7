//! Creates the customer and provider profiles for an approved application.

use tracing::{info, warn};
use uuid::Uuid;

use super::identity_resolver::PROVIDER_ROLE;
use crate::error::AppResult;
use crate::models::{NewCustomerProfile, NewProviderProfile, ProviderApplication};
use crate::repositories::{CustomerRepository, ProviderProfileRepository};

const DEFAULT_FIRST_NAME: &str = "Usuario";
const DEFAULT_LAST_NAME: &str = "Proveedor";
const DEFAULT_PROVIDER_TYPE: &str = "individual";

#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedProfiles {
    pub customer_profile_id: Uuid,
    pub provider_profile_id: Uuid,
    pub customer_created: bool,
    pub provider_created: bool,
}

/// Splits a headline into first and last name: the first word, then the rest.
///
/// An empty or missing headline gives `("Usuario", "Proveedor")`.
pub fn split_headline(headline: Option<&str>) -> (String, String) {
    let headline = headline.map(str::trim).unwrap_or_default();
    let mut words = headline.split_whitespace();
    match words.next() {
        Some(first) => (first.to_string(), words.collect::<Vec<_>>().join(" ")),
        None => (DEFAULT_FIRST_NAME.to_string(), DEFAULT_LAST_NAME.to_string()),
    }
}

/// Explicit names from the form win over the headline split.
pub fn resolve_names(application: &ProviderApplication) -> (String, String) {
    let data = &application.application_data;
    match data.first_name.as_deref() {
        Some(first) => (
            first.to_string(),
            data.last_name.clone().unwrap_or_default(),
        ),
        None => split_headline(application.headline.as_deref()),
    }
}

#[derive(Clone)]
pub struct ProfileMaterializer {
    customers: CustomerRepository,
    providers: ProviderProfileRepository,
    default_hourly_rate: f64,
}

impl ProfileMaterializer {
    pub fn new(
        customers: CustomerRepository,
        providers: ProviderProfileRepository,
        default_hourly_rate: f64,
    ) -> Self {
        Self {
            customers,
            providers,
            default_hourly_rate,
        }
    }

    /// Ensures both profiles exist for `identity_id`.
    ///
    /// Each profile is looked up before it is created, so a retry after a
    /// partial failure only creates what is missing.
    pub async fn materialize(
        &self,
        identity_id: Uuid,
        application: &ProviderApplication,
    ) -> AppResult<MaterializedProfiles> {
        let (first_name, last_name) = resolve_names(application);

        let (customer_profile_id, customer_created) =
            match self.customers.find_active_by_user(identity_id).await? {
                Some(existing) => (existing.id, false),
                None => {
                    let created = self
                        .customers
                        .create(&NewCustomerProfile {
                            user_id: identity_id,
                            first_name: first_name.clone(),
                            last_name: last_name.clone(),
                            phone_number: application.phone.clone(),
                            role: PROVIDER_ROLE.to_string(),
                        })
                        .await?;
                    info!(customer_profile_id = %created.id, "Created customer profile");
                    (created.id, true)
                }
            };

        let (provider_profile_id, provider_created) =
            match self.providers.find_by_user(identity_id).await? {
                Some(existing) if existing.is_active => (existing.id, false),
                Some(existing) => {
                    self.providers.activate(existing.id).await?;
                    info!(provider_profile_id = %existing.id, "Reactivated provider profile");
                    (existing.id, false)
                }
                None => {
                    let created = self
                        .providers
                        .create(&self.provider_profile(identity_id, application, &first_name, &last_name))
                        .await?;
                    info!(provider_profile_id = %created.id, "Created provider profile");
                    (created.id, true)
                }
            };

        Ok(MaterializedProfiles {
            customer_profile_id,
            provider_profile_id,
            customer_created,
            provider_created,
        })
    }

    /// Ids of the profiles already present for `identity_id`, as
    /// `(customer, provider)`.
    pub async fn existing(&self, identity_id: Uuid) -> AppResult<(Option<Uuid>, Option<Uuid>)> {
        let customer = self.customers.find_active_by_user(identity_id).await?;
        let provider = self.providers.find_by_user(identity_id).await?;
        Ok((customer.map(|c| c.id), provider.map(|p| p.id)))
    }

    fn provider_profile(
        &self,
        identity_id: Uuid,
        application: &ProviderApplication,
        first_name: &str,
        last_name: &str,
    ) -> NewProviderProfile {
        let hourly_rate = application.parsed_hourly_rate().unwrap_or_else(|| {
            warn!(
                application_id = application.id,
                raw = ?application.hourly_rate,
                fallback = self.default_hourly_rate,
                "Hourly rate missing or not numeric, using fallback"
            );
            self.default_hourly_rate
        });

        let business_name = format!("{first_name} {last_name}").trim().to_string();

        NewProviderProfile {
            user_id: identity_id,
            business_name,
            headline: application.headline.clone(),
            bio: application.bio.clone(),
            hourly_rate,
            location: application.location.clone(),
            phone: application.phone.clone(),
            provider_type: application
                .application_data
                .provider_type
                .clone()
                .unwrap_or_else(|| DEFAULT_PROVIDER_TYPE.to_string()),
            is_active: true,
            application_id: Some(application.id),
        }
    }
}
