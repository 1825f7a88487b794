//! Initialization and configuration sync for Agenta applications.
//!
//! [`init`] resolves the connection to the Agenta backend (explicit
//! arguments first, then `AGENTA_*` environment variables), looks up the
//! app and base IDs by name when needed, and publishes the resulting
//! identity and [`Configuration`] in [`globals`].

pub mod api;
pub mod backend;
pub mod configuration;
pub mod error;
pub mod globals;
pub mod identity;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use backend::Backend;
pub use configuration::{Configuration, PullOutcome, PushOutcome};
pub use error::{AgentaError, ConfigurationError, Result};
pub use identity::{ConnectionIdentity, InitArgs};
pub use resolver::{ConnectionResolver, SharedConfiguration};

/// Initialize the SDK against the HTTP backend and publish the result.
pub async fn init(args: InitArgs) -> Result<ConnectionResolver> {
    init_with(ConnectionResolver::new(), args).await
}

/// Run `init` on `resolver` and publish its identity and configuration.
pub async fn init_with(
    mut resolver: ConnectionResolver,
    args: InitArgs,
) -> Result<ConnectionResolver> {
    resolver.init(args).await?;

    if let (Some(setup), Ok(config)) = (resolver.setup(), resolver.current_config()) {
        globals::set_global(setup, config);
    }
    Ok(resolver)
}
