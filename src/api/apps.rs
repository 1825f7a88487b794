use tracing::debug;

use super::client::ApiClient;
use super::types::{AppSummary, RequestError};

impl ApiClient {
    /// List applications, filtered by name
    pub async fn list_apps(
        &self,
        host: &str,
        api_key: Option<&str>,
        app_name: &str,
    ) -> Result<Vec<AppSummary>, RequestError> {
        let apps: Vec<AppSummary> = self
            .get_api("apps/", host, api_key, &[("app_name", app_name)])
            .await?;

        debug!("Found {} app(s) named {}", apps.len(), app_name);
        Ok(apps)
    }
}
