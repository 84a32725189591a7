use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;

use super::{Query, ROW_SERVICE, RowStore};
use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};

const REST_PATH: &str = "rest/v1";

/// REST client for the backend's tables, using the service-role key so row
/// level security does not apply.
#[derive(Clone)]
pub struct HttpRowStore {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl HttpRowStore {
    pub fn new(client: Client, config: &BackendConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn url(&self, table: &str, params: &[(String, String)], operation: &str) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}/{REST_PATH}/{table}", self.base_url))
            .map_err(|e| AppError::downstream(ROW_SERVICE, operation, e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        operation: &str,
    ) -> AppResult<Vec<Value>> {
        let mut request = self
            .client
            .request(method, url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=representation");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::from_transport(ROW_SERVICE, operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_status(
                ROW_SERVICE,
                operation,
                status.as_u16(),
                &body,
            ));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| AppError::downstream(ROW_SERVICE, operation, format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl RowStore for HttpRowStore {
    async fn select(&self, table: &str, query: &Query) -> AppResult<Vec<Value>> {
        let operation = format!("select {table}");
        let url = self.url(table, &query.to_params(), &operation)?;
        self.execute(Method::GET, url, None, &operation).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        let operation = format!("insert {table}");
        let url = self.url(table, &[], &operation)?;
        self.execute(Method::POST, url, Some(Value::Array(rows)), &operation)
            .await
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> AppResult<Vec<Value>> {
        let operation = format!("update {table}");
        // Only filters apply to an update; ordering and paging are dropped.
        let filters_only = Query {
            filters: query.filters.clone(),
            ..Query::default()
        };
        let url = self.url(table, &filters_only.to_params(), &operation)?;
        self.execute(Method::PATCH, url, Some(patch), &operation)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> HttpRowStore {
        let config = BackendConfig {
            url: server.uri(),
            service_role_key: "service-key".to_string(),
            ..BackendConfig::default()
        };
        HttpRowStore::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn test_select_renders_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(query_param("select", "*"))
            .and(query_param("is_active", "eq.true"))
            .and(query_param("order", "name.asc"))
            .and(header("apikey", "service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Limpieza" }
            ])))
            .mount(&server)
            .await;

        let rows = store(&server)
            .select(
                "categories",
                &Query::new().eq("is_active", true).order_by("name", true),
            )
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({ "id": 1, "name": "Limpieza" })]);
    }

    #[tokio::test]
    async fn test_insert_asks_for_representation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/provider_categories"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!([{ "provider_id": "p", "category_id": 3 }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                { "provider_id": "p", "category_id": 3 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = store(&server)
            .insert(
                "provider_categories",
                vec![json!({ "provider_id": "p", "category_id": 3 })],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_update_is_conditional() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/provider_applications"))
            .and(query_param("id", "eq.9"))
            .and(query_param("status", "in.(submitted,in_review)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let rows = store(&server)
            .update(
                "provider_applications",
                &Query::new()
                    .eq("id", 9)
                    .in_list("status", ["submitted", "in_review"])
                    .limit(1),
                json!({ "status": "approved" }),
            )
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_conflict_is_not_transient() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key"))
            .mount(&server)
            .await;

        let err = store(&server)
            .insert("customers", vec![json!({})])
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("duplicate key"));
    }
}
