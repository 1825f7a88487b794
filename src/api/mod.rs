//! HTTP client for the Agenta backend.
//!
//! `ApiClient` knows the REST endpoints under `{host}/api/`; `AgentaClient`
//! binds it to a host and API key and implements [`crate::backend::Backend`].

mod apps;
mod authenticated;
mod bases;
mod client;
mod configs;
mod types;

pub use authenticated::AgentaClient;
pub use client::ApiClient;
pub use types::{
    ApiError, ApiStatus, AppSummary, BaseSummary, ConfigSelector, RemoteConfig, RequestError,
};
