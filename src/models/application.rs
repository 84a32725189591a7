//! Provider application rows and the typed `application_data` bag.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::de;

pub const APPLICATIONS_TABLE: &str = "provider_applications";

/// Review status of a provider application.
///
/// `Approved` and `Rejected` are terminal; only an explicit admin override
/// moves an approved application to `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    InReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "in_review" | "in-review" => Ok(Self::InReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

/// Free-form details captured by the application form.
///
/// Known keys are typed; anything else is kept in `extra` so that rows
/// round-trip without losing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationData {
    #[serde(
        default,
        deserialize_with = "de::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_years: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Value>,

    /// Categories the applicant wants to offer services in
    #[serde(default, deserialize_with = "de::id_list")]
    pub category_ids: Vec<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A row of `provider_applications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderApplication {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Stored loosely; may be a number, a numeric string or missing
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Value>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(value_type = Object)]
    pub application_data: ApplicationData,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub reviewed_at: Option<Timestamp>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<Timestamp>,
}

impl ProviderApplication {
    /// Parses `hourly_rate`, returning `None` when it is missing, not a
    /// number, negative or not finite.
    pub fn parsed_hourly_rate(&self) -> Option<f64> {
        let rate = match self.hourly_rate.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            _ => return None,
        };
        (rate.is_finite() && rate >= 0.0).then_some(rate)
    }

    /// Name used to greet the applicant.
    pub fn display_name(&self) -> String {
        let data = &self.application_data;
        let full = [data.first_name.as_deref(), data.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }

        match self.headline.as_deref().map(str::trim) {
            Some(headline) if !headline.is_empty() => headline.to_string(),
            _ => self.email.clone(),
        }
    }
}

/// Insert payload for a freshly submitted application.
#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    pub email: String,
    pub phone: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<Value>,
    pub location: Option<String>,
    pub application_data: ApplicationData,
    pub status: ApplicationStatus,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
