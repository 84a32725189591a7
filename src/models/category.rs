use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const CATEGORIES_TABLE: &str = "categories";
pub const PROVIDER_CATEGORIES_TABLE: &str = "provider_categories";

/// A service category such as plumbing or cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Association between a provider profile and a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryLink {
    pub provider_id: Uuid,
    pub category_id: i64,
}
