//! The plugin contract shared by every hardware capability module.
//!
//! A *plugin* is a self-contained capability with a start/stop lifecycle and
//! a free-text status string (e.g. `"Idle"`, `"Connected on /dev/ttyACM0"`,
//! `"not found"`).  The registry stores plugins exclusively as
//! `Arc<dyn Plugin>` and never downcasts; routes that need a concrete
//! operation (such as the LED stub's `set_led`) hold their own typed handle
//! to the same instance.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──► Enabled ──► (Active | Error) ──► Disabled
//! ```
//!
//! Plugins are constructed once at process start and dropped only at process
//! exit.  `start` on an already-enabled plugin and `stop` on an already-
//! disabled plugin are no-ops, never errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Snapshot of one plugin for the `/status` route and client rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub status: String,
}

/// Uniform contract over the capability set.
///
/// Implementations use interior mutability: all methods take `&self` so a
/// single `Arc<dyn Plugin>` can be shared between the registry and the
/// plugin's own background threads.
pub trait Plugin: Send + Sync {
    /// Stable identifier used in API routes (e.g. `"joystick"`, `"led"`).
    fn id(&self) -> &str;

    /// Human-readable name shown in client UIs.
    fn name(&self) -> &str;

    /// Enables the plugin.  Idempotent.
    fn start(&self);

    /// Disables the plugin and releases its resources cooperatively.
    /// Idempotent.
    fn stop(&self);

    /// Returns the current descriptor snapshot.
    fn describe(&self) -> PluginDescriptor;
}

/// Shared enabled-flag + status-string state embedded in every plugin.
///
/// The enabled flag is an atomic because worker loops poll it from their own
/// threads; the status string sits behind a `Mutex` because it is written by
/// worker threads and read by HTTP handlers.
#[derive(Debug)]
pub struct PluginState {
    enabled: AtomicBool,
    status: Mutex<String>,
}

impl PluginState {
    /// Creates a disabled state with the given initial status text.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            status: Mutex::new(status.into()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn status(&self) -> String {
        self.status.lock().expect("status lock poisoned").clone()
    }

    pub fn set_status(&self, status: impl Into<String>) {
        *self.status.lock().expect("status lock poisoned") = status.into();
    }

    /// Builds a [`PluginDescriptor`] from this state plus identity fields.
    pub fn describe(&self, id: &str, name: &str) -> PluginDescriptor {
        PluginDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            enabled: self.enabled(),
            status: self.status(),
        }
    }
}

impl Default for PluginState {
    fn default() -> Self {
        Self::new("Idle")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
