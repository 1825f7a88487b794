use serde_json::{Map, Value};
use tracing::debug;

use super::client::ApiClient;
use super::types::{ConfigSelector, RemoteConfig, RequestError, SaveConfigRequest};

impl ApiClient {
    /// Save parameters under a named configuration of a base.
    ///
    /// With `overwrite` false the server keeps an existing configuration of
    /// the same name.
    pub async fn save_config(
        &self,
        host: &str,
        api_key: Option<&str>,
        base_id: &str,
        config_name: &str,
        parameters: &Map<String, Value>,
        overwrite: bool,
    ) -> Result<(), RequestError> {
        let body = SaveConfigRequest {
            base_id,
            config_name,
            parameters,
            overwrite,
        };

        debug!("=== Save Config Request ===");
        self.post_api("configs/", host, api_key, &body).await?;
        debug!("Saved configuration {} for base {}", config_name, base_id);
        Ok(())
    }

    /// Fetch a configuration of a base by name or by deployed environment
    pub async fn get_config(
        &self,
        host: &str,
        api_key: Option<&str>,
        base_id: &str,
        selector: &ConfigSelector,
    ) -> Result<RemoteConfig, RequestError> {
        let (key, value) = selector.query_pair();
        self.get_api("configs/", host, api_key, &[("base_id", base_id), (key, value)])
            .await
    }
}
