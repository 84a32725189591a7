//! Provider application DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::pagination::{default_page, default_page_size};
use crate::models::{ApplicationData, ApplicationStatus, NewApplication};
use crate::services::ApprovalResult;

/// Body of a public application submission.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "email": "ana@example.com",
    "phone": "+54 11 5555 0000",
    "headline": "Ana María Gómez",
    "bio": "Electricista matriculada con 10 años de experiencia",
    "hourly_rate": 450,
    "location": "Córdoba",
    "application_data": { "category_ids": [1, 2] }
}))]
pub struct SubmitApplicationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 200, message = "Headline must be at most 200 characters"))]
    pub headline: Option<String>,

    #[validate(length(max = 4000, message = "Bio must be at most 4000 characters"))]
    pub bio: Option<String>,

    /// A number or a numeric string; anything else falls back to the
    /// default rate on approval
    #[validate(custom(function = "validate_loose_rate"))]
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Value>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub application_data: Option<ApplicationData>,
}

/// Rejects only values that can never be a rate: negative numbers, booleans,
/// arrays and objects. Unparseable strings are kept and resolved later.
fn validate_loose_rate(rate: &Value) -> Result<(), ValidationError> {
    match rate {
        Value::Null | Value::String(_) => Ok(()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v >= 0.0) => Ok(()),
        _ => Err(ValidationError::new("hourly_rate")
            .with_message("Hourly rate must be a non-negative number".into())),
    }
}

impl SubmitApplicationRequest {
    pub fn into_new_application(self) -> NewApplication {
        NewApplication {
            email: self.email,
            phone: self.phone,
            headline: self.headline,
            bio: self.bio,
            hourly_rate: self.hourly_rate,
            location: self.location,
            application_data: self.application_data.unwrap_or_default(),
            status: ApplicationStatus::Submitted,
        }
    }
}

/// Filters for the admin application list.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListApplicationsQuery {
    /// Only return applications in this status
    pub status: Option<ApplicationStatus>,

    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,

    /// Number of items per page (max 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub page_size: u32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RejectApplicationRequest {
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,

    /// Reject even an approved application
    #[serde(default)]
    pub force: bool,
}

/// Approval outcome wrapped in the success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResponse {
    /// Always true; failures use the error envelope
    pub success: bool,
    #[serde(flatten)]
    pub result: ApprovalResult,
}

impl From<ApprovalResult> for ApprovalResponse {
    fn from(result: ApprovalResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SubmitApplicationRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_submit_requires_valid_email() {
        assert!(request(json!({ "email": "ana@example.com" })).validate().is_ok());
        assert!(request(json!({ "email": "not-an-email" })).validate().is_err());
        assert!(serde_json::from_value::<SubmitApplicationRequest>(json!({})).is_err());
    }

    #[test]
    fn test_hourly_rate_is_loose() {
        for rate in [json!(450), json!("450.5"), json!("a convenir"), Value::Null] {
            let body = request(json!({ "email": "ana@example.com", "hourly_rate": rate }));
            assert!(body.validate().is_ok(), "rate {rate} should be accepted");
        }
        for rate in [json!(-1), json!(true), json!([1])] {
            let body = request(json!({ "email": "ana@example.com", "hourly_rate": rate }));
            assert!(body.validate().is_err(), "rate {rate} should be rejected");
        }
    }

    #[test]
    fn test_into_new_application_is_submitted() {
        let new = request(json!({
            "email": "ana@example.com",
            "application_data": { "category_ids": [3], "first_name": "Ana" }
        }))
        .into_new_application();

        assert_eq!(new.status, ApplicationStatus::Submitted);
        assert_eq!(new.application_data.category_ids, vec![3]);
        assert_eq!(new.application_data.first_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_list_query_rejects_oversized_page() {
        let query: ListApplicationsQuery =
            serde_json::from_value(json!({ "page": 1, "page_size": 500 })).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_reject_body_defaults() {
        let body: RejectApplicationRequest = serde_json::from_value(json!({})).unwrap();
        assert!(body.reason.is_none());
        assert!(!body.force);
    }
}
