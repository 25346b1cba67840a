use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::entities::Table;

use crate::store::{Filter, Mutation, Store, StoreError};

/// Name of the plpgsql function that applies a change batch in one transaction.
pub const APPLY_CHANGES_RPC: &str = "apply_changes";

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.service_key).map_err(|_| StoreError::Api {
            status: 0,
            message: "Service key is not a valid header value".to_string(),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key)).map_err(|_| {
            StoreError::Api {
                status: 0,
                message: "Service key is not a valid header value".to_string(),
            }
        })?;

        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers()?)
            .query(query);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// PostgREST renders equality filters as `column=eq.value`.
fn filter_query(filter: &Filter) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];

    for (column, value) in filter.conditions() {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        query.push((column.clone(), format!("eq.{}", rendered)));
    }

    query
}

pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.supabase
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let path = format!("/rest/v1/{}", table.name());

        self.supabase
            .request(Method::GET, &path, &filter_query(filter), None)
            .await
    }

    async fn apply(&self, changes: Vec<Mutation>) -> Result<usize, StoreError> {
        let count = changes.len();
        let path = format!("/rest/v1/rpc/{}", APPLY_CHANGES_RPC);

        let applied: i64 = self
            .supabase
            .request(Method::POST, &path, &[], Some(json!({ "changes": changes })))
            .await?;

        debug!("Supabase applied {} of {} mutations", applied, count);
        Ok(usize::try_from(applied).unwrap_or(count))
    }
}
