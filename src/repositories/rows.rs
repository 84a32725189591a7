//! Typed access to one table of the row store.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::external::backend::{Query, ROW_SERVICE, RowStore};

/// A table handle that decodes rows into `T`-shaped models.
#[derive(Clone)]
pub struct Rows {
    store: Arc<dyn RowStore>,
    table: &'static str,
}

impl Rows {
    pub fn new(store: Arc<dyn RowStore>, table: &'static str) -> Self {
        Self { store, table }
    }

    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> AppResult<Vec<T>> {
        let rows = self.store.select(self.table, query).await?;
        self.decode_all(rows)
    }

    /// At most one row may match; zero rows yields `None`.
    pub async fn maybe_single<T: DeserializeOwned>(&self, query: &Query) -> AppResult<Option<T>> {
        let mut rows = self.store.select(self.table, &query.clone().limit(2)).await?;
        match rows.len() {
            0 => Ok(None),
            1 => self.decode(rows.remove(0)).map(Some),
            _ => Err(AppError::downstream(
                ROW_SERVICE,
                format!("select {}", self.table),
                "expected at most one row, found several",
            )),
        }
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert<N: Serialize, T: DeserializeOwned>(&self, new: &N) -> AppResult<T> {
        let mut rows = self.store.insert(self.table, vec![self.encode(new)?]).await?;
        if rows.len() != 1 {
            return Err(AppError::downstream(
                ROW_SERVICE,
                format!("insert {}", self.table),
                format!("expected one row back, got {}", rows.len()),
            ));
        }
        self.decode(rows.remove(0))
    }

    /// Inserts all rows in a single request.
    pub async fn insert_many<N: Serialize, T: DeserializeOwned>(
        &self,
        new: &[N],
    ) -> AppResult<Vec<T>> {
        let rows = new
            .iter()
            .map(|row| self.encode(row))
            .collect::<AppResult<Vec<_>>>()?;
        let stored = self.store.insert(self.table, rows).await?;
        self.decode_all(stored)
    }

    pub async fn update<T: DeserializeOwned>(&self, query: &Query, patch: Value) -> AppResult<Vec<T>> {
        let rows = self.store.update(self.table, query, patch).await?;
        self.decode_all(rows)
    }

    fn encode<N: Serialize>(&self, row: &N) -> AppResult<Value> {
        serde_json::to_value(row).map_err(|e| AppError::Internal { source: e.into() })
    }

    fn decode<T: DeserializeOwned>(&self, row: Value) -> AppResult<T> {
        serde_json::from_value(row).map_err(|e| {
            AppError::downstream(
                ROW_SERVICE,
                format!("decode {}", self.table),
                e.to_string(),
            )
        })
    }

    fn decode_all<T: DeserializeOwned>(&self, rows: Vec<Value>) -> AppResult<Vec<T>> {
        rows.into_iter().map(|row| self.decode(row)).collect()
    }
}
