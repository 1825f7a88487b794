//! Connection resolution context.
//!
//! `ConnectionResolver` turns init arguments (or their environment fallbacks)
//! into a [`ConnectionIdentity`], looks up app and base IDs by name when
//! needed, and owns the resulting [`Configuration`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut resolver = ConnectionResolver::new();
//! resolver.init(InitArgs::new().app_name("chat").base_name("main")).await?;
//!
//! let config = resolver.current_config()?;
//! config.lock().await.pull_default().await?;
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{AgentaClient, RequestError};
use crate::backend::Backend;
use crate::configuration::Configuration;
use crate::error::{AgentaError, Result};
use crate::identity::{ConnectionIdentity, InitArgs};

/// Configuration handle shared between the resolver and global state.
pub type SharedConfiguration = Arc<Mutex<Configuration>>;

#[derive(Default)]
pub struct ConnectionResolver {
    identity: Option<Arc<ConnectionIdentity>>,
    config: Option<SharedConfiguration>,
    backend: Option<Arc<dyn Backend>>,
}

impl ConnectionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `backend` for all remote calls instead of an HTTP client built
    /// from the resolved host and API key.
    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::default()
        }
    }

    /// Resolve the identity from `args` and the process environment.
    pub async fn init(&mut self, args: InitArgs) -> Result<()> {
        self.init_with_env(args, |key| std::env::var(key).ok()).await
    }

    /// Resolve the identity from `args`, using `lookup` for environment
    /// fallbacks.
    ///
    /// A later call replaces identity and configuration wholesale. On error
    /// the previous state is kept.
    pub async fn init_with_env<F>(&mut self, args: InitArgs, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut identity = ConnectionIdentity::resolve(args, lookup);

        if !identity.is_persistable() {
            warn!(
                "Your configuration will not be saved permanently since app_name and base_name are not provided."
            );
        }

        let backend = self.backend_for(&identity)?;

        if identity.needs_lookup() {
            if let (Some(app_name), Some(base_name)) =
                (identity.app_name.clone(), identity.base_name.clone())
            {
                let (app_id, base_id) = resolve_ids(backend.as_ref(), &app_name, &base_name)
                    .await
                    .map_err(AgentaError::Request)?;
                identity.app_id = Some(app_id);
                identity.base_id = Some(base_id);
            }
        }

        let config = Configuration::new(
            identity.base_id.clone(),
            Some(identity.host.clone()),
            Some(backend),
        );

        info!(
            "Agenta initialized (host: {}, base_id: {:?}, persist: {})",
            identity.host,
            identity.base_id,
            config.persist()
        );

        self.identity = Some(Arc::new(identity));
        self.config = Some(Arc::new(Mutex::new(config)));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    pub fn identity(&self) -> Option<&ConnectionIdentity> {
        self.identity.as_deref()
    }

    /// The identity as a shareable handle.
    pub fn setup(&self) -> Option<Arc<ConnectionIdentity>> {
        self.identity.clone()
    }

    /// The current configuration; fails before `init` has completed.
    pub fn current_config(&self) -> Result<SharedConfiguration> {
        self.config.clone().ok_or(AgentaError::NotInitialized)
    }

    fn backend_for(&self, identity: &ConnectionIdentity) -> Result<Arc<dyn Backend>> {
        if let Some(backend) = &self.backend {
            return Ok(backend.clone());
        }
        let client = AgentaClient::new(identity.host.clone(), identity.api_key.clone())
            .map_err(AgentaError::Request)?;
        Ok(Arc::new(client))
    }
}

/// Look up the app by name, then the base by app ID and name.
///
/// When the backend returns several matches the first one is used.
async fn resolve_ids(
    backend: &dyn Backend,
    app_name: &str,
    base_name: &str,
) -> std::result::Result<(String, String), RequestError> {
    let apps = backend.list_apps(app_name).await?;
    let app_id = apps
        .into_iter()
        .next()
        .map(|app| app.app_id)
        .ok_or_else(|| RequestError::NotFound(format!("App with name {} not found", app_name)))?;

    let bases = backend.list_bases(&app_id, base_name).await?;
    let base_id = bases
        .into_iter()
        .next()
        .map(|base| base.base_id)
        .ok_or_else(|| {
            RequestError::NotFound(format!("No base was found for the app {}", app_id))
        })?;

    debug!("Resolved app_id {} and base_id {}", app_id, base_id);
    Ok((app_id, base_id))
}
