//! Parameter set of one variant, mirrored to and from the backend.
//!
//! Local operations (`set`, `get`, `all`) always succeed. Remote
//! synchronization is best-effort: `push` and the default registration log a
//! warning on failure and carry on with local state, and `pull` only fails
//! when the caller asks for a specific remote configuration that this
//! instance has no way to reach.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::api::{ConfigSelector, RemoteConfig, RequestError};
use crate::backend::Backend;
use crate::error::ConfigurationError;

/// Name of the configuration registered by [`Configuration::default`].
pub const DEFAULT_CONFIG_NAME: &str = "default";

/// Parameter written by `pull` with the version of the fetched configuration.
pub const CURRENT_VERSION_KEY: &str = "current_version";

/// Keys describing the connection rather than the variant; `all()` omits them.
const BOOKKEEPING_KEYS: &[&str] = &[
    "app_name",
    "base_name",
    "host",
    "base_id",
    "api_key",
    "persist",
];

/// Result of a push attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Not persistable, nothing was sent
    Skipped,
    Saved,
    /// The request failed and was logged
    Failed,
}

/// Result of a pull attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PullOutcome {
    /// Not persistable, local state untouched
    Skipped,
    /// Remote parameters were applied locally
    Applied { version: Value },
    /// The fetch failed and was logged; local state untouched
    Failed,
}

pub struct Configuration {
    base_id: Option<String>,
    host: Option<String>,
    persist: bool,
    parameters: Map<String, Value>,
    backend: Option<Arc<dyn Backend>>,
}

impl Configuration {
    /// Create a configuration bound to `base_id` on `host`.
    ///
    /// The instance is persistable only when both are present.
    pub fn new(
        base_id: Option<String>,
        host: Option<String>,
        backend: Option<Arc<dyn Backend>>,
    ) -> Self {
        let persist = base_id.is_some() && host.is_some();
        Self {
            base_id,
            host,
            persist,
            parameters: Map::new(),
            backend,
        }
    }

    /// A configuration that never talks to the server.
    pub fn local() -> Self {
        Self::new(None, None, None)
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    pub fn base_id(&self) -> Option<&str> {
        self.base_id.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Merge `params` into the local parameters, overwriting existing names.
    pub fn set<I, K>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in params {
            self.parameters.insert(key.into(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Deserialize a parameter into `T`; `None` when absent or of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.parameters
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    /// Every local parameter except the connection bookkeeping keys.
    pub fn all(&self) -> Map<String, Value> {
        self.parameters
            .iter()
            .filter(|(key, _)| !BOOKKEEPING_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Set `params` locally, then try to save them as the "default" configuration.
    ///
    /// Local values are usable even when the server is unreachable.
    pub async fn default(&mut self, params: Map<String, Value>, overwrite: bool) -> PushOutcome {
        self.set(params.clone());
        match self.try_push(DEFAULT_CONFIG_NAME, overwrite, &params).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "Unable to push the default configuration to the server: {}",
                    e
                );
                PushOutcome::Failed
            }
        }
    }

    /// Alias for [`Configuration::default`].
    pub async fn register_default(
        &mut self,
        params: Map<String, Value>,
        overwrite: bool,
    ) -> PushOutcome {
        self.default(params, overwrite).await
    }

    /// Save `params` under `config_name` on the server. Never fails.
    pub async fn push(
        &self,
        config_name: &str,
        overwrite: bool,
        params: &Map<String, Value>,
    ) -> PushOutcome {
        match self.try_push(config_name, overwrite, params).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "Failed to push the configuration to the server with error: {}",
                    e
                );
                PushOutcome::Failed
            }
        }
    }

    /// Like [`Configuration::push`] but returns the request error.
    pub async fn try_push(
        &self,
        config_name: &str,
        overwrite: bool,
        params: &Map<String, Value>,
    ) -> Result<PushOutcome, RequestError> {
        let Some((base_id, backend)) = self.remote() else {
            return Ok(PushOutcome::Skipped);
        };

        backend
            .save_config(base_id, config_name, params, overwrite)
            .await?;
        debug!("Pushed configuration {} ({} parameters)", config_name, params.len());
        Ok(PushOutcome::Saved)
    }

    /// Fetch a configuration and apply its parameters locally.
    ///
    /// `environment_name` takes precedence over `config_name`. Asking for
    /// anything but the bare default on a non-persistable configuration is an
    /// error; every other failure is logged and leaves local state unchanged.
    pub async fn pull(
        &mut self,
        config_name: &str,
        environment_name: Option<&str>,
    ) -> Result<PullOutcome, ConfigurationError> {
        let Some((base_id, backend)) = self.remote() else {
            if config_name != DEFAULT_CONFIG_NAME || environment_name.is_some() {
                return Err(ConfigurationError::PersistenceUnavailable);
            }
            return Ok(PullOutcome::Skipped);
        };

        let selector = match environment_name {
            Some(env) => ConfigSelector::Environment(env.to_string()),
            None => ConfigSelector::Name(config_name.to_string()),
        };

        let fetched = backend.get_config(base_id, &selector).await;
        match fetched {
            Ok(config) => Ok(self.apply(config)),
            Err(e) => {
                warn!(
                    "Failed to pull the configuration from the server with error: {}",
                    e
                );
                Ok(PullOutcome::Failed)
            }
        }
    }

    /// `pull` of the "default" configuration.
    pub async fn pull_default(&mut self) -> Result<PullOutcome, ConfigurationError> {
        self.pull(DEFAULT_CONFIG_NAME, None).await
    }

    fn apply(&mut self, config: RemoteConfig) -> PullOutcome {
        let version = config.current_version;
        self.set([(CURRENT_VERSION_KEY, version.clone())]);
        self.set(config.parameters);
        PullOutcome::Applied { version }
    }

    /// Base ID and backend, when this instance can reach the server.
    fn remote(&self) -> Option<(&str, Arc<dyn Backend>)> {
        if !self.persist {
            return None;
        }
        let base_id = self.base_id.as_deref()?;
        let backend = self.backend.clone()?;
        Some((base_id, backend))
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("base_id", &self.base_id)
            .field("host", &self.host)
            .field("persist", &self.persist)
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use serde_json::json;
    use tracing_test::traced_test;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn persistable(backend: &Arc<FakeBackend>) -> Configuration {
        Configuration::new(
            Some("base-1".to_string()),
            Some("http://localhost".to_string()),
            Some(backend.clone() as Arc<dyn Backend>),
        )
    }

    #[test]
    fn test_persist_requires_base_id_and_host() {
        let cases = [
            (Some("b"), Some("h"), true),
            (Some("b"), None, false),
            (None, Some("h"), false),
            (None, None, false),
        ];
        for (base_id, host, expected) in cases {
            let config = Configuration::new(
                base_id.map(String::from),
                host.map(String::from),
                None,
            );
            assert_eq!(config.persist(), expected, "base_id={:?} host={:?}", base_id, host);
        }
    }

    #[test]
    fn test_set_merges_and_overwrites() {
        let mut config = Configuration::local();
        config.set(params(json!({"a": 1})));
        config.set(params(json!({"b": 2})));
        assert_eq!(config.all(), params(json!({"a": 1, "b": 2})));

        config.set(params(json!({"a": 3})));
        assert_eq!(config.get("a"), Some(&json!(3)));
        assert_eq!(config.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_set_preserves_insertion_order() {
        let mut config = Configuration::local();
        config.set([("zeta", json!(1)), ("alpha", json!(2))]);
        let keys: Vec<String> = config.all().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_all_omits_bookkeeping_keys() {
        let mut config = Configuration::local();
        assert!(config.all().is_empty());

        config.set(params(json!({
            "app_name": "chat",
            "base_name": "main",
            "host": "http://localhost",
            "base_id": "b1",
            "api_key": "secret",
            "persist": true,
            "temperature": 0.2,
        })));

        assert_eq!(config.all(), params(json!({"temperature": 0.2})));
        assert!(config.contains("api_key"));
    }

    #[test]
    fn test_get_as_deserializes() {
        let mut config = Configuration::local();
        config.set([("max_tokens", json!(256)), ("model", json!("gpt-4"))]);
        assert_eq!(config.get_as::<u32>("max_tokens"), Some(256));
        assert_eq!(config.get_as::<String>("model").as_deref(), Some("gpt-4"));
        assert_eq!(config.get_as::<u32>("model"), None);
        assert_eq!(config.get_as::<u32>("missing"), None);
    }

    #[tokio::test]
    async fn test_push_without_persist_makes_no_calls() {
        let backend = Arc::new(FakeBackend::default());
        let config = Configuration::new(
            None,
            Some("http://localhost".to_string()),
            Some(backend.clone() as Arc<dyn Backend>),
        );

        let outcome = config.push("default", true, &params(json!({"a": 1}))).await;
        assert_eq!(outcome, PushOutcome::Skipped);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_push_sends_parameters() {
        let backend = Arc::new(FakeBackend::default());
        let config = persistable(&backend);

        let outcome = config.push("v2", false, &params(json!({"a": 1}))).await;
        assert_eq!(outcome, PushOutcome::Saved);

        let saved = backend.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].base_id, "base-1");
        assert_eq!(saved[0].config_name, "v2");
        assert_eq!(saved[0].parameters, params(json!({"a": 1})));
        assert!(!saved[0].overwrite);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_push_is_swallowed() {
        let backend = Arc::new(FakeBackend {
            fail_save: true,
            ..Default::default()
        });
        let mut config = persistable(&backend);
        config.set(params(json!({"a": 1})));

        let outcome = config.push("default", true, &params(json!({"b": 2}))).await;
        assert_eq!(outcome, PushOutcome::Failed);
        assert_eq!(config.all(), params(json!({"a": 1})));
        assert!(logs_contain("Failed to push the configuration"));
        assert!(logs_contain("internal error"));

        let err = config
            .try_push("default", true, &params(json!({"b": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Api(_)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_default_sets_locally_even_when_push_fails() {
        let backend = Arc::new(FakeBackend {
            fail_save: true,
            ..Default::default()
        });
        let mut config = persistable(&backend);

        let outcome = config
            .register_default(params(json!({"temperature": 0.5})), false)
            .await;
        assert_eq!(outcome, PushOutcome::Failed);
        assert_eq!(config.get("temperature"), Some(&json!(0.5)));

        logs_assert(|lines: &[&str]| {
            let warnings: Vec<&&str> = lines.iter().filter(|l| l.contains("WARN")).collect();
            match warnings.as_slice() {
                [only] if only.contains("Unable to push the default configuration")
                    && only.contains("internal error") =>
                {
                    Ok(())
                }
                other => Err(format!("expected one default-push warning, got {:?}", other)),
            }
        });
    }

    #[tokio::test]
    async fn test_default_pushes_under_default_name() {
        let backend = Arc::new(FakeBackend::default());
        let mut config = persistable(&backend);

        let outcome = config.default(params(json!({"model": "gpt-4"})), true).await;
        assert_eq!(outcome, PushOutcome::Saved);

        let saved = backend.saved();
        assert_eq!(saved[0].config_name, DEFAULT_CONFIG_NAME);
        assert!(saved[0].overwrite);
    }

    #[tokio::test]
    async fn test_pull_non_default_requires_persist() {
        let mut config = Configuration::local();

        let err = config.pull("custom", None).await.unwrap_err();
        assert!(matches!(err, ConfigurationError::PersistenceUnavailable));

        let err = config.pull("default", Some("production")).await.unwrap_err();
        assert!(matches!(err, ConfigurationError::PersistenceUnavailable));
    }

    #[tokio::test]
    async fn test_pull_default_without_persist_is_noop() {
        let mut config = Configuration::local();
        config.set([("a", json!(1))]);

        let outcome = config.pull_default().await.unwrap();
        assert_eq!(outcome, PullOutcome::Skipped);
        assert_eq!(config.all(), params(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_pull_applies_parameters_and_version() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_config("default", 4, params(json!({"temperature": 0.9})));
        let mut config = persistable(&backend);
        config.set([("temperature", json!(0.1)), ("keep", json!(true))]);

        let outcome = config.pull_default().await.unwrap();
        assert_eq!(outcome, PullOutcome::Applied { version: json!(4) });
        assert_eq!(
            config.all(),
            params(json!({"temperature": 0.9, "keep": true, "current_version": 4}))
        );
    }

    #[tokio::test]
    async fn test_pull_environment_takes_precedence() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_config("custom", 1, params(json!({"from": "name"})));
        backend.put_environment("production", 7, params(json!({"from": "environment"})));
        let mut config = persistable(&backend);

        config.pull("custom", Some("production")).await.unwrap();
        assert_eq!(config.get("from"), Some(&json!("environment")));
        assert_eq!(config.get(CURRENT_VERSION_KEY), Some(&json!(7)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_pull_leaves_state_unchanged() {
        let backend = Arc::new(FakeBackend::default());
        let mut config = persistable(&backend);
        config.set([("a", json!(1))]);

        let outcome = config.pull("missing", None).await.unwrap();
        assert_eq!(outcome, PullOutcome::Failed);
        assert_eq!(config.all(), params(json!({"a": 1})));
        assert!(!config.contains(CURRENT_VERSION_KEY));
        assert!(logs_contain("Failed to pull the configuration"));
    }
}
