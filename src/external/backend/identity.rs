use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use uuid::Uuid;

use super::{IDENTITY_SERVICE, IdentityStore};
use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Identity, NewIdentity};

const ADMIN_USERS_PATH: &str = "auth/v1/admin/users";

/// Identity admin API client authenticated with the service-role key.
#[derive(Clone)]
pub struct HttpIdentityStore {
    client: Client,
    base_url: String,
    service_role_key: String,
}

#[derive(Deserialize)]
struct UserPage {
    #[serde(default)]
    users: Vec<Identity>,
}

impl HttpIdentityStore {
    pub fn new(client: Client, config: &BackendConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn url(&self, suffix: &str, operation: &str) -> AppResult<Url> {
        let raw = format!("{}/{ADMIN_USERS_PATH}{suffix}", self.base_url);
        Url::parse(&raw).map_err(|e| AppError::downstream(IDENTITY_SERVICE, operation, e.to_string()))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::from_transport(IDENTITY_SERVICE, operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_status(
                IDENTITY_SERVICE,
                operation,
                status.as_u16(),
                &body,
            ));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::downstream(IDENTITY_SERVICE, operation, format!("invalid JSON: {e}"))
        })
    }
}

#[async_trait]
impl IdentityStore for HttpIdentityStore {
    async fn list_identities(&self, page: u32, per_page: u32) -> AppResult<Vec<Identity>> {
        let mut url = self.url("", "list_identities")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());

        let body: UserPage = self.send(self.client.get(url), "list_identities").await?;
        debug!(page, count = body.users.len(), "Fetched identity page");
        Ok(body.users)
    }

    async fn create_identity(&self, new: &NewIdentity) -> AppResult<Identity> {
        let url = self.url("", "create_identity")?;
        self.send(self.client.post(url).json(new), "create_identity")
            .await
    }

    async fn update_identity_metadata(
        &self,
        id: Uuid,
        metadata: Map<String, Value>,
    ) -> AppResult<()> {
        let url = self.url(&format!("/{id}"), "update_identity_metadata")?;
        let _: Value = self
            .send(
                self.client
                    .put(url)
                    .json(&json!({ "user_metadata": metadata })),
                "update_identity_metadata",
            )
            .await?;
        Ok(())
    }

    async fn set_password(&self, id: Uuid, password: &str) -> AppResult<()> {
        let url = self.url(&format!("/{id}"), "set_password")?;
        let _: Value = self
            .send(
                self.client.put(url).json(&json!({ "password": password })),
                "set_password",
            )
            .await?;
        Ok(())
    }
}
