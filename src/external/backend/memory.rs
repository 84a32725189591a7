//! In-memory identity and row stores with failure injection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::query::cell_text;
use super::{IDENTITY_SERVICE, IdentityStore, Query, ROW_SERVICE, RowStore};
use crate::error::{AppError, AppResult};
use crate::models::{Identity, NewIdentity};

/// Tables whose primary key is a generated integer rather than a UUID.
const SERIAL_TABLES: &[&str] = &["provider_applications", "categories"];

#[derive(Default)]
pub struct MemoryIdentityStore {
    identities: Mutex<Vec<Identity>>,
    passwords: Mutex<HashMap<Uuid, String>>,
    pub create_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.identities.lock().unwrap().push(Identity {
            id,
            email: Some(email.to_string()),
            user_metadata: Map::new(),
            app_metadata: Map::new(),
        });
        id
    }

    pub fn seed_with_role(&self, email: &str, role: &str) -> Uuid {
        let id = self.seed(email);
        if let Some(identity) = self.identities.lock().unwrap().iter_mut().find(|i| i.id == id) {
            identity
                .user_metadata
                .insert("role".to_string(), Value::from(role));
        }
        id
    }

    pub fn all(&self) -> Vec<Identity> {
        self.identities.lock().unwrap().clone()
    }

    pub fn with_email(&self, email: &str) -> Vec<Identity> {
        self.all()
            .into_iter()
            .filter(|identity| identity.has_email(email))
            .collect()
    }

    pub fn password_of(&self, id: Uuid) -> Option<String> {
        self.passwords.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn list_identities(&self, page: u32, per_page: u32) -> AppResult<Vec<Identity>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let start = (page.saturating_sub(1) * per_page) as usize;
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn create_identity(&self, new: &NewIdentity) -> AppResult<Identity> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::from_status(
                IDENTITY_SERVICE,
                "create_identity",
                500,
                "injected failure",
            ));
        }

        let mut identities = self.identities.lock().unwrap();
        if identities.iter().any(|i| i.has_email(&new.email)) {
            return Err(AppError::from_status(
                IDENTITY_SERVICE,
                "create_identity",
                422,
                "A user with this email address has already been registered",
            ));
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: Some(new.email.clone()),
            user_metadata: new.user_metadata.clone(),
            app_metadata: Map::new(),
        };
        self.passwords
            .lock()
            .unwrap()
            .insert(identity.id, new.password.clone());
        identities.push(identity.clone());
        Ok(identity)
    }

    async fn update_identity_metadata(
        &self,
        id: Uuid,
        metadata: Map<String, Value>,
    ) -> AppResult<()> {
        tokio::task::yield_now().await;
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AppError::from_status(
                IDENTITY_SERVICE,
                "update_identity_metadata",
                500,
                "injected failure",
            ));
        }

        let mut identities = self.identities.lock().unwrap();
        let identity = identities
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::from_status(IDENTITY_SERVICE, "update", 404, "no user"))?;
        identity.user_metadata.extend(metadata);
        Ok(())
    }

    async fn set_password(&self, id: Uuid, password: &str) -> AppResult<()> {
        tokio::task::yield_now().await;
        if !self.identities.lock().unwrap().iter().any(|i| i.id == id) {
            return Err(AppError::from_status(IDENTITY_SERVICE, "set_password", 404, "no user"));
        }
        self.passwords
            .lock()
            .unwrap()
            .insert(id, password.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Select,
    Insert,
    Update,
}

struct FailureRule {
    table: String,
    op: Op,
    /// Remaining failures; `None` fails forever
    remaining: Option<usize>,
}

/// A write by another process, applied just before a matching update.
struct Interposition {
    table: String,
    filtered_column: String,
    changes: Value,
}

struct RejectRule {
    table: String,
    column: String,
    value: String,
}

#[derive(Default)]
pub struct MemoryRowStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<Vec<FailureRule>>,
    rejects: Mutex<Vec<RejectRule>>,
    interpositions: Mutex<Vec<Interposition>>,
    next_serial: AtomicUsize,
    pub insert_calls: AtomicUsize,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self {
            next_serial: AtomicUsize::new(1),
            ..Self::default()
        }
    }

    /// Inserts rows directly, assigning ids where missing.
    pub fn seed(&self, table: &str, rows: Vec<Value>) -> Vec<Value> {
        let mut tables = self.tables.lock().unwrap();
        let stored: Vec<Value> = rows.into_iter().map(|row| self.complete(table, row)).collect();
        tables
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());
        stored
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every `op` on `table` fail.
    pub fn fail(&self, table: &str, op: Op) {
        self.push_failure(table, op, None);
    }

    /// Makes the next `times` calls of `op` on `table` fail.
    pub fn fail_times(&self, table: &str, op: Op, times: usize) {
        self.push_failure(table, op, Some(times));
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
        self.rejects.lock().unwrap().clear();
    }

    /// Rejects any insert into `table` carrying `column = value`, the way a
    /// foreign key violation would.
    pub fn reject_value(&self, table: &str, column: &str, value: impl ToString) {
        self.rejects.lock().unwrap().push(RejectRule {
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        });
    }

    /// The next update on `table` that filters on `filtered_column` first
    /// sees `changes` applied to the rows it targets, as if another writer
    /// got there between the caller's read and its conditional write.
    pub fn interpose_before_update(&self, table: &str, filtered_column: &str, changes: Value) {
        self.interpositions.lock().unwrap().push(Interposition {
            table: table.to_string(),
            filtered_column: filtered_column.to_string(),
            changes,
        });
    }

    fn take_interposition(&self, table: &str, query: &Query) -> Option<Value> {
        let mut interpositions = self.interpositions.lock().unwrap();
        let index = interpositions.iter().position(|i| {
            i.table == table && query.filters.iter().any(|f| f.column == i.filtered_column)
        })?;
        Some(interpositions.remove(index).changes)
    }

    fn push_failure(&self, table: &str, op: Op, remaining: Option<usize>) {
        self.failures.lock().unwrap().push(FailureRule {
            table: table.to_string(),
            op,
            remaining,
        });
    }

    fn check_failure(&self, table: &str, op: Op) -> AppResult<()> {
        let mut failures = self.failures.lock().unwrap();
        let Some(rule) = failures
            .iter_mut()
            .find(|r| r.table == table && r.op == op && r.remaining != Some(0))
        else {
            return Ok(());
        };
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }
        Err(AppError::from_status(
            ROW_SERVICE,
            &format!("{op:?} {table}").to_lowercase(),
            503,
            "injected failure",
        ))
    }

    fn complete(&self, table: &str, mut row: Value) -> Value {
        if let Value::Object(map) = &mut row {
            if !map.contains_key("id") {
                let id = if SERIAL_TABLES.contains(&table) {
                    Value::from(self.next_serial.fetch_add(1, Ordering::SeqCst) as i64)
                } else {
                    Value::String(Uuid::new_v4().to_string())
                };
                map.insert("id".to_string(), id);
            }
            map.entry("created_at")
                .or_insert_with(|| Value::String(jiff::Timestamp::now().to_string()));
        }
        row
    }
}

fn merge(row: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(changes)) = (row, patch) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn compare_cells(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => cell_text(a).cmp(&cell_text(b)),
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, table: &str, query: &Query) -> AppResult<Vec<Value>> {
        tokio::task::yield_now().await;
        self.check_failure(table, Op::Select)?;

        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| query.matches(row))
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_cells(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        Ok(rows
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.check_failure(table, Op::Insert)?;

        {
            let rejects = self.rejects.lock().unwrap();
            let rejected = rows.iter().any(|row| {
                rejects.iter().any(|rule| {
                    rule.table == table
                        && row
                            .get(&rule.column)
                            .and_then(cell_text)
                            .is_some_and(|v| v == rule.value)
                })
            });
            if rejected {
                return Err(AppError::from_status(
                    ROW_SERVICE,
                    &format!("insert {table}"),
                    409,
                    "violates foreign key constraint",
                ));
            }
        }

        Ok(self.seed(table, rows))
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> AppResult<Vec<Value>> {
        tokio::task::yield_now().await;
        self.check_failure(table, Op::Update)?;
        let interposed = self.take_interposition(table, query);

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        if let Some(changes) = interposed {
            for row in rows.iter_mut().filter(|row| query.matches(row)) {
                merge(row, &changes);
            }
        }

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| query.matches(row)) {
            merge(row, &patch);
            updated.push(row.clone());
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_conditional_update_only_touches_matches() {
        let store = MemoryRowStore::new();
        store.seed(
            "provider_applications",
            vec![json!({"status": "submitted"}), json!({"status": "approved"})],
        );

        let updated = store
            .update(
                "provider_applications",
                &Query::new().in_list("status", ["submitted"]),
                json!({"status": "in_review"}),
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["id"], json!(1));
    }

    #[tokio::test]
    async fn test_interposed_write_defeats_conditional_update() {
        let store = MemoryRowStore::new();
        store.seed("provider_applications", vec![json!({"status": "submitted"})]);
        store.interpose_before_update("provider_applications", "status", json!({"status": "rejected"}));

        let query = Query::new().eq("id", 1).in_list("status", ["submitted"]);
        let updated = store
            .update("provider_applications", &query, json!({"status": "approved"}))
            .await
            .unwrap();
        assert!(updated.is_empty());
        assert_eq!(store.rows("provider_applications")[0]["status"], json!("rejected"));

        // The interposition fires once.
        let query = Query::new().eq("id", 1).in_list("status", ["rejected"]);
        let updated = store
            .update("provider_applications", &query, json!({"status": "submitted"}))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection_counts_down() {
        let store = MemoryRowStore::new();
        store.fail_times("customers", Op::Insert, 1);

        assert!(store.insert("customers", vec![json!({})]).await.is_err());
        assert!(store.insert("customers", vec![json!({})]).await.is_ok());
    }

    #[tokio::test]
    async fn test_identity_store_rejects_duplicate_email() {
        let store = MemoryIdentityStore::new();
        store.seed("ana@example.com");

        let err = store
            .create_identity(&NewIdentity {
                email: "ANA@example.com".into(),
                password: "x".into(),
                email_confirm: true,
                user_metadata: Map::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Downstream { .. }));
        assert_eq!(store.all().len(), 1);
    }
}
