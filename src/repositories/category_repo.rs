//! Categories and provider category links.

use std::sync::Arc;

use uuid::Uuid;

use super::rows::Rows;
use crate::error::AppResult;
use crate::external::backend::{Query, RowStore};
use crate::models::{CATEGORIES_TABLE, Category, CategoryLink, PROVIDER_CATEGORIES_TABLE};

#[derive(Clone)]
pub struct CategoryRepository {
    categories: Rows,
    links: Rows,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            categories: Rows::new(store.clone(), CATEGORIES_TABLE),
            links: Rows::new(store, PROVIDER_CATEGORIES_TABLE),
        }
    }

    /// Active categories ordered by name.
    pub async fn list_active(&self) -> AppResult<Vec<Category>> {
        let query = Query::new().eq("is_active", true).order_by("name", true);
        self.categories.select(&query).await
    }

    pub async fn linked_category_ids(&self, provider_id: Uuid) -> AppResult<Vec<i64>> {
        let links: Vec<CategoryLink> = self
            .links
            .select(&Query::new().eq("provider_id", provider_id))
            .await?;
        Ok(links.into_iter().map(|link| link.category_id).collect())
    }

    /// Inserts all links in one request; fails as a whole.
    pub async fn link_many(&self, links: &[CategoryLink]) -> AppResult<usize> {
        let stored: Vec<CategoryLink> = self.links.insert_many(links).await?;
        Ok(stored.len())
    }

    /// Cheap read used by the readiness probe.
    pub async fn ping(&self) -> AppResult<()> {
        self.categories
            .select::<serde_json::Value>(&Query::new().limit(1))
            .await
            .map(|_| ())
    }

    pub async fn link_one(&self, link: &CategoryLink) -> AppResult<()> {
        let _: CategoryLink = self.links.insert(link).await?;
        Ok(())
    }
}
