use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::types::{ApiError, RequestError};

/// Default request timeout in seconds
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default SDK version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the default User-Agent string
fn build_user_agent() -> String {
    std::env::var("AGENTA_USER_AGENT")
        .unwrap_or_else(|_| format!("agenta-rs/{}", DEFAULT_VERSION))
}

/// Base URL of the REST API for a backend host (`{host}/api/`)
pub(super) fn api_base_url(host: &str) -> Result<Url, RequestError> {
    let base = format!("{}/api/", host.trim_end_matches('/'));
    Ok(Url::parse(&base)?)
}

/// HTTP client for the Agenta REST API
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) user_agent: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(user_agent: Option<String>) -> Result<Self, RequestError> {
        Self::with_timeout(user_agent, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new API client whose requests give up after `timeout`
    pub fn with_timeout(user_agent: Option<String>, timeout: Duration) -> Result<Self, RequestError> {
        let user_agent = user_agent.unwrap_or_else(build_user_agent);

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, user_agent })
    }

    pub(super) fn build_url(host: &str, endpoint: &str) -> Result<Url, RequestError> {
        let base = api_base_url(host)?;
        Ok(base.join(endpoint.trim_start_matches('/'))?)
    }

    fn prepare(
        &self,
        request: RequestBuilder,
        api_key: Option<&str>,
        request_id: &str,
    ) -> RequestBuilder {
        let request = request
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", request_id);

        match api_key {
            Some(key) => request.header("Authorization", key),
            None => request,
        }
    }

    /// Issue a GET with query parameters and decode the JSON response
    pub(super) async fn get_api<R>(
        &self,
        endpoint: &str,
        host: &str,
        api_key: Option<&str>,
        query: &[(&str, &str)],
    ) -> Result<R, RequestError>
    where
        R: DeserializeOwned,
    {
        let url = Self::build_url(host, endpoint)?;
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("GET {} {:?}", url, query);

        let request = self.prepare(self.client.get(url).query(query), api_key, &request_id);
        let body = Self::send(request, &request_id).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Issue a POST with a JSON body; the response body is returned raw
    pub(super) async fn post_api<T>(
        &self,
        endpoint: &str,
        host: &str,
        api_key: Option<&str>,
        body: &T,
    ) -> Result<String, RequestError>
    where
        T: Serialize,
    {
        let url = Self::build_url(host, endpoint)?;
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("POST {}", url);

        let request = self.prepare(
            self.client
                .post(url)
                .header("Content-Type", "application/json")
                .json(body),
            api_key,
            &request_id,
        );
        Self::send(request, &request_id).await
    }

    async fn send(request: RequestBuilder, request_id: &str) -> Result<String, RequestError> {
        let response = request.send().await?;

        let status = response.status();
        debug!("=== API Response ===");
        debug!("Status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let api_error = ApiError::from_http_response(
                status.as_u16(),
                error_text,
                Some(request_id.to_string()),
            );
            error!("API request failed: {}", api_error.message);
            return Err(api_error.into());
        }

        Ok(response.text().await?)
    }
}
