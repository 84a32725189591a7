//! Customer profile DTOs.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::services::ProfileDetails;

/// Body of `POST /api/profiles`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "first_name": "Ana",
    "last_name": "Gómez",
    "phone_number": "+54 11 5555 0000"
}))]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone_number: Option<String>,
}

impl From<CreateProfileRequest> for ProfileDetails {
    fn from(req: CreateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
        }
    }
}
