//! The permission gate for privileged hardware routes.
//!
//! An app may drive hardware only when three facts hold at once: the
//! installer lists it as installed, the catalog flags it `plugin == "YES"`,
//! and it has declared itself connected.  The catalog and installed files
//! are consulted live on every check, so revoking the flag or uninstalling
//! an app takes effect on its next request.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use bridge_core::is_privileged_eligible;

use crate::infrastructure::store::{CatalogStore, ConnectionStore};

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("app '{0}' is not permitted to use plugin routes")]
    Forbidden(String),
}

pub struct PermissionGate {
    catalog: Arc<CatalogStore>,
    connections: Arc<ConnectionStore>,
}

impl PermissionGate {
    pub fn new(catalog: Arc<CatalogStore>, connections: Arc<ConnectionStore>) -> Self {
        Self {
            catalog,
            connections,
        }
    }

    /// Allows or denies one privileged request.
    pub fn check_privileged(&self, app_id: &str) -> Result<(), PermissionError> {
        let entry = self.catalog.entry(app_id);
        let installed = self.catalog.is_installed(app_id);
        let connected = self.connections.is_connected(app_id);

        if is_privileged_eligible(entry.as_ref(), installed, connected) {
            Ok(())
        } else {
            debug!(app_id, installed, connected, "privileged request denied");
            Err(PermissionError::Forbidden(app_id.to_string()))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
