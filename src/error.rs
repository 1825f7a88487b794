use crate::api::RequestError;

/// Errors surfaced to callers of the SDK.
#[derive(Debug, thiserror::Error)]
pub enum AgentaError {
    /// Name to ID resolution failed during `init`.
    #[error("Failed to get base id and/or app_id from the server with error: {0}")]
    Request(#[source] RequestError),

    #[error("Agenta has not been initialized; call init first")]
    NotInitialized,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors raised by [`crate::Configuration`] operations that cannot degrade.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "Cannot pull the configuration from the server since the app_name and base_name are not provided."
    )]
    PersistenceUnavailable,
}

pub type Result<T, E = AgentaError> = std::result::Result<T, E>;
