//! The plugin registry: ordered, mutex-guarded collection of every
//! capability plugin.
//!
//! Vec-backed rather than map-backed so `describe_all` always reports
//! plugins in registration order; clients render the list verbatim and a
//! stable order keeps their UIs from reshuffling between polls.  Lookups
//! scan linearly, which is fine for a handful of plugins.
//!
//! The registry never downcasts: routes needing a concrete operation (LED,
//! temperature) hold their own typed `Arc` to the same instance they
//! registered here.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::info;

use bridge_core::{Plugin, PluginDescriptor};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Mutex<Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin.  Registration order is the order `describe_all`
    /// reports.
    pub fn register(&self, plugin: Arc<dyn Plugin>) {
        info!(id = plugin.id(), "plugin registered");
        self.plugins
            .lock()
            .expect("registry lock poisoned")
            .push(plugin);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .find(|p| p.id() == id)
            .cloned()
    }

    /// Enables or disables one plugin.  Already in the requested state is a
    /// no-op; an unknown id is an error.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), RegistryError> {
        let plugin = self
            .get(id)
            .ok_or_else(|| RegistryError::UnknownPlugin(id.to_string()))?;

        if plugin.describe().enabled == enabled {
            return Ok(());
        }
        if enabled {
            plugin.start();
        } else {
            plugin.stop();
        }
        Ok(())
    }

    /// Starts every registered plugin, in registration order.
    pub fn start_all(&self) {
        for plugin in self.snapshot() {
            plugin.start();
        }
    }

    /// Stops every registered plugin, in reverse registration order.
    pub fn stop_all(&self) {
        for plugin in self.snapshot().into_iter().rev() {
            plugin.stop();
        }
    }

    /// Descriptor snapshot of all plugins, in registration order.
    pub fn describe_all(&self) -> Vec<PluginDescriptor> {
        self.snapshot().iter().map(|p| p.describe()).collect()
    }

    // Cloned handles so start/stop calls run without holding the registry
    // lock (a plugin stop joins worker threads and can take a while).
    fn snapshot(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins
            .lock()
            .expect("registry lock poisoned")
            .clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
