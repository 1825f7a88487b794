use tracing::debug;

use super::client::ApiClient;
use super::types::{BaseSummary, RequestError};

impl ApiClient {
    /// List the bases of an application, filtered by base name
    pub async fn list_bases(
        &self,
        host: &str,
        api_key: Option<&str>,
        app_id: &str,
        base_name: &str,
    ) -> Result<Vec<BaseSummary>, RequestError> {
        let bases: Vec<BaseSummary> = self
            .get_api(
                "bases/",
                host,
                api_key,
                &[("app_id", app_id), ("base_name", base_name)],
            )
            .await?;

        debug!(
            "Found {} base(s) named {} in app {}",
            bases.len(),
            base_name,
            app_id
        );
        Ok(bases)
    }
}
