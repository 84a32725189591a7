//! Hosted backend collaborators.
//!
//! The backend exposes an identity admin API and a REST interface over its
//! relational tables. Both sit behind traits so services can be driven by
//! in-memory fakes in tests.

mod identity;
#[cfg(test)]
pub mod memory;
mod query;
mod rows;

pub use identity::HttpIdentityStore;
pub use query::Query;
pub use rows::HttpRowStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Identity, NewIdentity};

pub const IDENTITY_SERVICE: &str = "identity_store";
pub const ROW_SERVICE: &str = "row_store";

/// Account management in the hosted identity store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns one page of identities. Pages start at 1; a page shorter
    /// than `per_page` is the last one.
    async fn list_identities(&self, page: u32, per_page: u32) -> AppResult<Vec<Identity>>;

    async fn create_identity(&self, new: &NewIdentity) -> AppResult<Identity>;

    /// Merges `metadata` into the identity's user metadata.
    async fn update_identity_metadata(&self, id: Uuid, metadata: Map<String, Value>)
    -> AppResult<()>;

    /// Replaces the identity's password.
    async fn set_password(&self, id: Uuid, password: &str) -> AppResult<()>;
}

/// Generic row access over named tables.
///
/// Rows travel as JSON objects; typed access lives in the repositories.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> AppResult<Vec<Value>>;

    /// Inserts all rows in one request and returns them as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>>;

    /// Applies `patch` to every row matching `query` and returns the
    /// updated rows. An empty result means nothing matched.
    async fn update(&self, table: &str, query: &Query, patch: Value) -> AppResult<Vec<Value>>;
}
