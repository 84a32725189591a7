use crate::error::AppResult;
use crate::models::Category;
use crate::repositories::CategoryRepository;

/// Read access to the service category catalogue.
#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Category>> {
        self.categories.list_active().await
    }

    /// Round trip to the row store for the readiness probe.
    pub async fn ping(&self) -> AppResult<()> {
        self.categories.ping().await
    }
}
