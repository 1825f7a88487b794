//! Process-wide registry of the latest initialization.
//!
//! `agenta::init` publishes the resolved identity ("setup") and the shared
//! configuration here so code that never saw the resolver can reach them:
//!
//! ```ignore
//! // At startup:
//! agenta::init(InitArgs::new().app_name("chat").base_name("main")).await?;
//!
//! // Anywhere else:
//! if let Some(config) = agenta::globals::get_config() {
//!     let temperature = config.lock().await.get_as::<f64>("temperature");
//! }
//! ```
//!
//! Unlike a set-once cell, publishing again replaces the previous entry, so a
//! repeated init is visible everywhere.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::ConnectionIdentity;
use crate::resolver::SharedConfiguration;

/// Everything published by the latest init.
#[derive(Clone)]
pub struct Globals {
    pub setup: Arc<ConnectionIdentity>,
    pub config: SharedConfiguration,
}

static GLOBALS: RwLock<Option<Globals>> = RwLock::new(None);

fn read() -> RwLockReadGuard<'static, Option<Globals>> {
    GLOBALS.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write() -> RwLockWriteGuard<'static, Option<Globals>> {
    GLOBALS.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Publish `setup` and `config`, replacing any earlier publication.
pub fn set_global(setup: Arc<ConnectionIdentity>, config: SharedConfiguration) {
    if write().replace(Globals { setup, config }).is_some() {
        tracing::debug!("Replacing previously published Agenta globals");
    }
}

/// Returns `None` if nothing has been published yet.
pub fn get_global() -> Option<Globals> {
    read().clone()
}

pub fn get_setup() -> Option<Arc<ConnectionIdentity>> {
    read().as_ref().map(|g| g.setup.clone())
}

pub fn get_config() -> Option<SharedConfiguration> {
    read().as_ref().map(|g| g.config.clone())
}

pub fn has_global() -> bool {
    read().is_some()
}

/// Forget the published state.
pub fn clear_global() {
    write().take();
}
