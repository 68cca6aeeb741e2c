use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};

use crate::configs::settings::Database;
use crate::errors::StoreError;

/// Key-value access to the realtime database.
///
/// Paths are slash separated keys below the database root, e.g.
/// `streetlights` or `streetlights/lamp-01`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Full JSON value at `path`; `Value::Null` when nothing is stored there.
    async fn get(&self, path: &str) -> Result<Value, StoreError>;

    /// Whether any value is stored at `path`, without downloading it.
    async fn exists(&self, path: &str) -> Result<bool, StoreError>;

    /// Merges `fields` into the object at `path` in a single write.
    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError>;

    fn endpoint(&self) -> &str;
}

/// REST client for a Firebase-style realtime database.
#[derive(Clone)]
pub struct RealtimeDatabase {
    client: Client,
    base_url: String,
    credential: Option<String>,
}

impl RealtimeDatabase {
    pub fn new(database: &Database) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(database.timeout))
            .connect_timeout(Duration::from_secs(database.timeout))
            .build()
            .map_err(|e| StoreError::Connectivity(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: database.url.trim_end_matches('/').to_string(),
            credential: database.credential.clone().filter(|c| !c.is_empty()),
        })
    }

    pub fn resource_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn query(&self, shallow: bool) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if let Some(credential) = &self.credential {
            query.push(("auth", credential.clone()));
        }
        if shallow {
            query.push(("shallow", "true".to_string()));
        }
        query
    }

    async fn check(path: &str, response: Response) -> Result<Response, StoreError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.to_string());

        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Storage for RealtimeDatabase {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        let response = self
            .client
            .get(self.resource_url(path))
            .query(&self.query(false))
            .send()
            .await?;

        Ok(Self::check(path, response).await?.json::<Value>().await?)
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .get(self.resource_url(path))
            .query(&self.query(true))
            .send()
            .await?;

        let value = Self::check(path, response).await?.json::<Value>().await?;

        Ok(!value.is_null())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.resource_url(path))
            .query(&self.query(false))
            .json(&fields)
            .send()
            .await?;

        Self::check(path, response).await?;

        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
