//! Repository layer over the hosted row store.
//!
//! Each repository wraps a typed `Rows` handle for its table.

mod application_repo;
mod category_repo;
mod profile_repo;
mod rows;

pub use application_repo::ApplicationRepository;
pub use category_repo::CategoryRepository;
pub use profile_repo::{CustomerRepository, ProviderProfileRepository};
pub use rows::Rows;

use std::sync::Arc;

use crate::external::backend::RowStore;

/// Aggregates all repositories.
///
/// Cloning is cheap: every repository holds an `Arc` to the same store.
#[derive(Clone)]
pub struct Repositories {
    pub applications: ApplicationRepository,
    pub customers: CustomerRepository,
    pub providers: ProviderProfileRepository,
    pub categories: CategoryRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            applications: ApplicationRepository::new(store.clone()),
            customers: CustomerRepository::new(store.clone()),
            providers: ProviderProfileRepository::new(store.clone()),
            categories: CategoryRepository::new(store),
        }
    }
}
