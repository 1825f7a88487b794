//! Remote capabilities consumed from the application-management backend.
//!
//! `ConnectionResolver` and `Configuration` only talk to the server through
//! this trait. `api::AgentaClient` is the HTTP implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::{AppSummary, BaseSummary, ConfigSelector, RemoteConfig, RequestError};

#[async_trait]
pub trait Backend: Send + Sync {
    /// Applications whose name matches `app_name`.
    async fn list_apps(&self, app_name: &str) -> Result<Vec<AppSummary>, RequestError>;

    /// Bases of `app_id` whose name matches `base_name`.
    async fn list_bases(
        &self,
        app_id: &str,
        base_name: &str,
    ) -> Result<Vec<BaseSummary>, RequestError>;

    async fn save_config(
        &self,
        base_id: &str,
        config_name: &str,
        parameters: &Map<String, Value>,
        overwrite: bool,
    ) -> Result<(), RequestError>;

    async fn get_config(
        &self,
        base_id: &str,
        selector: &ConfigSelector,
    ) -> Result<RemoteConfig, RequestError>;
}
