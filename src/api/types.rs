//! API request and response types for the Agenta backend.
//!
//! This module contains data structures for communicating with
//! the Agenta REST API, plus the error types raised by requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application entry returned by `GET apps/`
#[derive(Debug, Clone, Deserialize)]
pub struct AppSummary {
    pub app_id: String,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Base entry returned by `GET bases/`
#[derive(Debug, Clone, Deserialize)]
pub struct BaseSummary {
    pub base_id: String,
    #[serde(default)]
    pub base_name: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
}

/// Save config request body
#[derive(Debug, Serialize)]
pub(super) struct SaveConfigRequest<'a> {
    pub base_id: &'a str,
    pub config_name: &'a str,
    pub parameters: &'a Map<String, Value>,
    pub overwrite: bool,
}

/// Configuration fetched from `GET configs/`
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub config_name: Option<String>,
    #[serde(default)]
    pub current_version: Value,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Selects which remote configuration a fetch targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSelector {
    /// A configuration saved under this name
    Name(String),
    /// Whatever configuration is deployed to this environment
    Environment(String),
}

impl ConfigSelector {
    /// Query parameter key/value for this selector
    pub(super) fn query_pair(&self) -> (&'static str, &str) {
        match self {
            ConfigSelector::Name(name) => ("config_name", name),
            ConfigSelector::Environment(env) => ("environment_name", env),
        }
    }
}

// ============================================================================
// API Status Codes
// ============================================================================

/// Classification of a non-success HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// Malformed request or invalid arguments (400, 422)
    InvalidArgument,
    /// Missing or rejected API key (401)
    Unauthenticated,
    /// Key valid but not allowed to touch this resource (403)
    PermissionDenied,
    /// Resource does not exist (404)
    NotFound,
    /// Existing configuration and overwrite was false (409)
    Conflict,
    /// Rate limit exceeded (429)
    ResourceExhausted,
    /// Server side failure (5xx)
    Unavailable,
    /// Anything else
    Unknown,
}

impl ApiStatus {
    /// Convert from HTTP status code to internal API status
    pub fn from_http_status(http_status: u16) -> Self {
        match http_status {
            400 | 422 => ApiStatus::InvalidArgument,
            401 => ApiStatus::Unauthenticated,
            403 => ApiStatus::PermissionDenied,
            404 => ApiStatus::NotFound,
            409 => ApiStatus::Conflict,
            429 => ApiStatus::ResourceExhausted,
            500..=599 => ApiStatus::Unavailable,
            _ => ApiStatus::Unknown,
        }
    }

    /// Get the error message for this status
    pub fn error_message(&self) -> &'static str {
        match self {
            ApiStatus::InvalidArgument => "Invalid request",
            ApiStatus::Unauthenticated => {
                "Authentication failed. Check AGENTA_API_KEY or pass an api key to init"
            }
            ApiStatus::PermissionDenied => "Permission denied",
            ApiStatus::NotFound => "Resource not found",
            ApiStatus::Conflict => "Configuration already exists",
            ApiStatus::ResourceExhausted => "Rate limit exceeded. Please wait and try again",
            ApiStatus::Unavailable => "Service temporarily unavailable",
            ApiStatus::Unknown => "Unknown error occurred",
        }
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_message())
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// API error with status code and details.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Internal API status classification
    pub status: ApiStatus,
    /// HTTP status code
    pub http_status: u16,
    /// Error message
    pub message: String,
    /// Request ID (for debugging)
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create from HTTP status code and response body
    pub fn from_http_response(http_status: u16, body: String, request_id: Option<String>) -> Self {
        let status = ApiStatus::from_http_status(http_status);

        let message = match status {
            ApiStatus::Unauthenticated => {
                format!("{} (HTTP {})", status.error_message(), http_status)
            }
            ApiStatus::ResourceExhausted => {
                format!(
                    "Rate limit exceeded (HTTP {}). Please wait and try again.",
                    http_status
                )
            }
            _ => {
                if body.is_empty() {
                    format!(
                        "API error (HTTP {}): {}",
                        http_status,
                        status.error_message()
                    )
                } else {
                    format!("API error (HTTP {}): {}", http_status, body)
                }
            }
        };

        Self {
            status,
            http_status,
            message,
            request_id,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Failure of a single backend request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}
