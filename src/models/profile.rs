//! Customer and provider profile rows.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const CUSTOMERS_TABLE: &str = "customers";
pub const PROVIDER_PROFILES_TABLE: &str = "provider_profiles";

/// Marketplace-side record of a person who can book services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub deleted_at: Option<Timestamp>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCustomerProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: String,
}

/// Marketplace-side record of a person or business offering services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub hourly_rate: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub provider_type: String,
    pub is_active: bool,
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProviderProfile {
    pub user_id: Uuid,
    pub business_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: f64,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub provider_type: String,
    pub is_active: bool,
    pub application_id: Option<i64>,
}
