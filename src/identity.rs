//! Connection identity and its resolution from arguments and environment.

use serde_json::{Map, Value};

pub const ENV_APP_NAME: &str = "AGENTA_APP_NAME";
pub const ENV_BASE_NAME: &str = "AGENTA_BASE_NAME";
pub const ENV_API_KEY: &str = "AGENTA_API_KEY";
pub const ENV_BASE_ID: &str = "AGENTA_BASE_ID";
pub const ENV_APP_ID: &str = "AGENTA_APP_ID";
pub const ENV_HOST: &str = "AGENTA_HOST";
pub const ENV_VARIANT_ID: &str = "AGENTA_VARIANT_ID";
pub const ENV_VARIANT_NAME: &str = "AGENTA_VARIANT_NAME";

/// Host used when neither an argument nor `AGENTA_HOST` provides one.
pub const DEFAULT_HOST: &str = "http://localhost";

/// Explicit arguments to `init`. Unset fields fall back to the environment.
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    pub app_name: Option<String>,
    pub base_name: Option<String>,
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub app_id: Option<String>,
    pub host: Option<String>,
    /// Additional keyword values, kept on the identity untouched.
    pub extra: Map<String, Value>,
}

impl InitArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Who this process is on the backend.
#[derive(Clone, Default)]
pub struct ConnectionIdentity {
    pub host: String,
    pub api_key: Option<String>,
    pub app_name: Option<String>,
    pub base_name: Option<String>,
    pub app_id: Option<String>,
    pub base_id: Option<String>,
    pub variant_id: Option<String>,
    pub variant_name: Option<String>,
    pub extra: Map<String, Value>,
}

impl ConnectionIdentity {
    /// Fill identity fields from `args`, falling back to `lookup` for each
    /// unset field. Empty values count as unset.
    pub fn resolve<F>(args: InitArgs, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let pick = |explicit: Option<String>, key: &str| {
            explicit.filter(|v| !v.is_empty()).or_else(|| env(key))
        };

        Self {
            app_name: pick(args.app_name, ENV_APP_NAME),
            base_name: pick(args.base_name, ENV_BASE_NAME),
            api_key: pick(args.api_key, ENV_API_KEY),
            base_id: pick(args.base_id, ENV_BASE_ID),
            app_id: pick(args.app_id, ENV_APP_ID),
            host: pick(args.host, ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            variant_id: env(ENV_VARIANT_ID),
            variant_name: env(ENV_VARIANT_NAME),
            extra: args.extra,
        }
    }

    /// Whether a configuration bound to this identity could be saved remotely.
    pub fn is_persistable(&self) -> bool {
        self.app_id.is_some() || (self.app_name.is_some() && self.base_name.is_some())
    }

    /// Both names are known and the base ID still has to be looked up.
    pub fn needs_lookup(&self) -> bool {
        self.base_id.is_none() && self.app_name.is_some() && self.base_name.is_some()
    }
}

impl std::fmt::Debug for ConnectionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionIdentity")
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("app_name", &self.app_name)
            .field("base_name", &self.base_name)
            .field("app_id", &self.app_id)
            .field("base_id", &self.base_id)
            .field("variant_id", &self.variant_id)
            .field("variant_name", &self.variant_name)
            .finish()
    }
}
