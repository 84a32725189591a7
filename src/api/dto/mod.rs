//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `application` - Provider application submission, listing and decisions
//! - `profile` - Customer profile self-service
//! - `health` - Health check responses
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod application;
mod error;
mod health;
mod pagination;
mod profile;

pub use application::{
    ApprovalResponse, ListApplicationsQuery, RejectApplicationRequest, SubmitApplicationRequest,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::{PagedResponse, PaginationMeta};
pub use profile::CreateProfileRequest;
