//! Read-only views over the installer-owned catalog and installed files.
//!
//! Both files are re-read on every call rather than cached: the installer
//! rewrites them behind the daemon's back, and a freshly installed app
//! should become connectable without restarting the bridge.  The files are
//! a few hundred bytes, so the reread costs nothing worth optimizing away.
//!
//! Unreadable or malformed files degrade to "nothing installed / empty
//! catalog" with a warning; permission checks then simply deny.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use bridge_core::{CatalogEntry, ConnectableApp};

use super::StoreError;

/// Top-level shape of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    apps: Vec<CatalogEntry>,
}

pub struct CatalogStore {
    catalog_path: PathBuf,
    installed_path: PathBuf,
}

impl CatalogStore {
    pub fn new(catalog_path: impl Into<PathBuf>, installed_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            installed_path: installed_path.into(),
        }
    }

    /// Current catalog entries, in file order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        match read_catalog(&self.catalog_path) {
            Ok(file) => file.apps,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.catalog_path.display(), "catalog unreadable: {e}");
                Vec::new()
            }
        }
    }

    /// The catalog entry for one app, if any.
    pub fn entry(&self, app_id: &str) -> Option<CatalogEntry> {
        self.entries().into_iter().find(|e| e.id == app_id)
    }

    /// Whether the installer currently lists `app_id` as installed.
    pub fn is_installed(&self, app_id: &str) -> bool {
        self.installed().contains_key(app_id)
    }

    /// The per-app connection view for `/status`: every catalog entry with
    /// its installed flag and the given connected lookup.
    pub fn connectable_apps(
        &self,
        is_connected: impl Fn(&str) -> bool,
    ) -> Vec<ConnectableApp> {
        let installed = self.installed();
        self.entries()
            .into_iter()
            .map(|entry| ConnectableApp {
                installed: installed.contains_key(&entry.id),
                connected: is_connected(&entry.id),
                id: entry.id,
                name: entry.name,
            })
            .collect()
    }

    fn installed(&self) -> BTreeMap<String, String> {
        match read_installed(&self.installed_path) {
            Ok(map) => map,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.installed_path.display(), "installed map unreadable: {e}");
                BTreeMap::new()
            }
        }
    }
}

fn read_catalog(path: &Path) -> Result<CatalogFile, StoreError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_installed(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_fixture(dir: &Path) -> CatalogStore {
        let catalog_path = dir.join("catalog.json");
        let installed_path = dir.join("installed.json");
        std::fs::write(
            &catalog_path,
            r#"{"apps": [
                {"id": "actions", "name": "Actions", "plugin": "YES"},
                {"id": "editor", "name": "Editor", "plugin": "NO"},
                {"id": "paint", "name": "Paint"}
            ]}"#,
        )
        .unwrap();
        std::fs::write(&installed_path, r#"{"actions": "1.2", "paint": "0.9"}"#).unwrap();
        CatalogStore::new(catalog_path, installed_path)
    }

    #[test]
    fn test_entries_preserve_file_order() {
        let dir = tempdir().unwrap();
        let store = write_fixture(dir.path());

        let ids: Vec<String> = store.entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["actions", "editor", "paint"]);
    }

    #[test]
    fn test_entry_lookup_by_id() {
        let dir = tempdir().unwrap();
        let store = write_fixture(dir.path());

        assert!(store.entry("actions").is_some_and(|e| e.allows_plugin()));
        assert!(store.entry("editor").is_some_and(|e| !e.allows_plugin()));
        assert!(store.entry("ghost").is_none());
    }

    #[test]
    fn test_is_installed_reads_installer_map() {
        let dir = tempdir().unwrap();
        let store = write_fixture(dir.path());

        assert!(store.is_installed("actions"));
        assert!(!store.is_installed("editor"));
    }

    #[test]
    fn test_connectable_apps_combines_all_flags() {
        let dir = tempdir().unwrap();
        let store = write_fixture(dir.path());

        let apps = store.connectable_apps(|id| id == "actions");
        assert_eq!(apps.len(), 3);

        let actions = &apps[0];
        assert!(actions.installed && actions.connected);

        let editor = &apps[1];
        assert!(!editor.installed && !editor.connected);

        let paint = &apps[2];
        assert!(paint.installed && !paint.connected);
    }

    #[test]
    fn test_missing_files_mean_empty_views() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("nope.json"), dir.path().join("nope2.json"));

        assert!(store.entries().is_empty());
        assert!(!store.is_installed("actions"));
        assert!(store.connectable_apps(|_| true).is_empty());
    }

    #[test]
    fn test_catalog_edits_visible_without_reload() {
        let dir = tempdir().unwrap();
        let store = write_fixture(dir.path());
        assert_eq!(store.entries().len(), 3);

        std::fs::write(
            dir.path().join("catalog.json"),
            r#"{"apps": [{"id": "actions", "name": "Actions", "plugin": "YES"}]}"#,
        )
        .unwrap();
        // No reload step: the next call sees the new file.
        assert_eq!(store.entries().len(), 1);
    }
}
