//! In-memory backend used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::{ApiError, AppSummary, BaseSummary, ConfigSelector, RemoteConfig, RequestError};
use crate::backend::Backend;

#[derive(Debug, Clone)]
pub struct SavedConfig {
    pub base_id: String,
    pub config_name: String,
    pub parameters: Map<String, Value>,
    pub overwrite: bool,
}

/// Serves canned apps, bases and configurations, and records every call.
#[derive(Default)]
pub struct FakeBackend {
    pub apps: Vec<AppSummary>,
    pub bases: Vec<BaseSummary>,
    pub fail_lookup: bool,
    pub fail_save: bool,
    pub(crate) configs: Mutex<HashMap<String, RemoteConfig>>,
    pub(crate) environments: Mutex<HashMap<String, RemoteConfig>>,
    pub(crate) saved: Mutex<Vec<SavedConfig>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_app(mut self, app_id: &str, app_name: &str) -> Self {
        self.apps.push(AppSummary {
            app_id: app_id.to_string(),
            app_name: Some(app_name.to_string()),
        });
        self
    }

    pub fn with_base(mut self, app_id: &str, base_id: &str, base_name: &str) -> Self {
        self.bases.push(BaseSummary {
            base_id: base_id.to_string(),
            base_name: Some(base_name.to_string()),
            app_id: Some(app_id.to_string()),
        });
        self
    }

    pub fn put_config(&self, name: &str, version: i64, parameters: Map<String, Value>) {
        self.configs
            .lock()
            .unwrap()
            .insert(name.to_string(), remote(name, version, parameters));
    }

    pub fn put_environment(&self, env: &str, version: i64, parameters: Map<String, Value>) {
        self.environments
            .lock()
            .unwrap()
            .insert(env.to_string(), remote(env, version, parameters));
    }

    pub fn saved(&self) -> Vec<SavedConfig> {
        self.saved.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn remote(name: &str, version: i64, parameters: Map<String, Value>) -> RemoteConfig {
    RemoteConfig {
        config_name: Some(name.to_string()),
        current_version: Value::from(version),
        parameters,
    }
}

fn server_error() -> RequestError {
    ApiError::from_http_response(500, "internal error".to_string(), None).into()
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_apps(&self, app_name: &str) -> Result<Vec<AppSummary>, RequestError> {
        self.record(format!("list_apps:{}", app_name));
        if self.fail_lookup {
            return Err(server_error());
        }
        Ok(self
            .apps
            .iter()
            .filter(|app| app.app_name.as_deref() == Some(app_name))
            .cloned()
            .collect())
    }

    async fn list_bases(
        &self,
        app_id: &str,
        base_name: &str,
    ) -> Result<Vec<BaseSummary>, RequestError> {
        self.record(format!("list_bases:{}:{}", app_id, base_name));
        if self.fail_lookup {
            return Err(server_error());
        }
        Ok(self
            .bases
            .iter()
            .filter(|base| {
                base.app_id.as_deref() == Some(app_id)
                    && base.base_name.as_deref() == Some(base_name)
            })
            .cloned()
            .collect())
    }

    async fn save_config(
        &self,
        base_id: &str,
        config_name: &str,
        parameters: &Map<String, Value>,
        overwrite: bool,
    ) -> Result<(), RequestError> {
        self.record(format!("save_config:{}:{}", base_id, config_name));
        if self.fail_save {
            return Err(server_error());
        }
        self.saved.lock().unwrap().push(SavedConfig {
            base_id: base_id.to_string(),
            config_name: config_name.to_string(),
            parameters: parameters.clone(),
            overwrite,
        });
        Ok(())
    }

    async fn get_config(
        &self,
        base_id: &str,
        selector: &ConfigSelector,
    ) -> Result<RemoteConfig, RequestError> {
        self.record(format!("get_config:{}:{:?}", base_id, selector));
        let found = match selector {
            ConfigSelector::Name(name) => self.configs.lock().unwrap().get(name).cloned(),
            ConfigSelector::Environment(env) => {
                self.environments.lock().unwrap().get(env).cloned()
            }
        };
        found.ok_or_else(|| {
            ApiError::from_http_response(404, "Config not found".to_string(), None).into()
        })
    }
}
