//! Backend client bound to a host and API key.
//!
//! `AgentaClient` wraps `ApiClient` and stores the connection credentials
//! resolved at init time, so callers never pass them per request.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::client::ApiClient;
use super::types::{AppSummary, BaseSummary, ConfigSelector, RemoteConfig, RequestError};
use crate::backend::Backend;

/// API client with stored host and API key.
///
/// Clones share the same `reqwest::Client` and its connection pool.
#[derive(Clone)]
pub struct AgentaClient {
    inner: Arc<ApiClient>,
    host: String,
    api_key: Option<String>,
}

impl AgentaClient {
    /// Create a new client for `host`, authenticating with `api_key` when given.
    pub fn new(host: impl Into<String>, api_key: Option<String>) -> Result<Self, RequestError> {
        Ok(Self::from_client(ApiClient::new(None)?, host, api_key))
    }

    /// Create from an existing ApiClient (for custom configuration).
    pub fn from_client(client: ApiClient, host: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            inner: Arc::new(client),
            host: host.into(),
            api_key,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Get the underlying ApiClient (for advanced use cases).
    pub fn inner(&self) -> &ApiClient {
        &self.inner
    }
}

#[async_trait]
impl Backend for AgentaClient {
    async fn list_apps(&self, app_name: &str) -> Result<Vec<AppSummary>, RequestError> {
        self.inner
            .list_apps(&self.host, self.api_key(), app_name)
            .await
    }

    async fn list_bases(
        &self,
        app_id: &str,
        base_name: &str,
    ) -> Result<Vec<BaseSummary>, RequestError> {
        self.inner
            .list_bases(&self.host, self.api_key(), app_id, base_name)
            .await
    }

    async fn save_config(
        &self,
        base_id: &str,
        config_name: &str,
        parameters: &Map<String, Value>,
        overwrite: bool,
    ) -> Result<(), RequestError> {
        self.inner
            .save_config(
                &self.host,
                self.api_key(),
                base_id,
                config_name,
                parameters,
                overwrite,
            )
            .await
    }

    async fn get_config(
        &self,
        base_id: &str,
        selector: &ConfigSelector,
    ) -> Result<RemoteConfig, RequestError> {
        self.inner
            .get_config(&self.host, self.api_key(), base_id, selector)
            .await
    }
}

impl std::fmt::Debug for AgentaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentaClient")
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
