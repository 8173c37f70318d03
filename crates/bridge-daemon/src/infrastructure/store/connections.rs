//! The connection registry: which client apps are currently connected.
//!
//! One lock covers the whole read-modify-write-persist cycle, so two
//! concurrent HTTP mutations can never interleave their rewrites of the
//! file.  Persistence failures are logged and swallowed; the in-memory map
//! remains authoritative for permission checks either way.
//!
//! Entries are flipped to `false` on disconnect but never removed, so the
//! file doubles as a history of every app that ever connected.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::StoreError;

pub struct ConnectionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, bool>>,
}

impl ConnectionStore {
    /// Loads the store from `path`.  A missing file is a normal first run
    /// and yields an empty map; a malformed file is logged and replaced on
    /// the next mutation.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_map(&path) {
            Ok(entries) => entries,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), "connection file unreadable, starting empty: {e}");
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Marks `app_id` connected.  Idempotent.
    pub fn connect(&self, app_id: &str) {
        let mut entries = self.entries.lock().expect("connections lock poisoned");
        entries.insert(app_id.to_string(), true);
        self.persist(&entries);
        debug!(app_id, "app connected");
    }

    /// Marks `app_id` disconnected.  Flips an existing entry only; an
    /// unknown app is not added, so disconnecting a stranger is a no-op.
    pub fn disconnect(&self, app_id: &str) {
        let mut entries = self.entries.lock().expect("connections lock poisoned");
        if let Some(connected) = entries.get_mut(app_id) {
            *connected = false;
            self.persist(&entries);
        }
        debug!(app_id, "app disconnected");
    }

    pub fn is_connected(&self, app_id: &str) -> bool {
        self.entries
            .lock()
            .expect("connections lock poisoned")
            .get(app_id)
            .copied()
            .unwrap_or(false)
    }

    /// Number of apps currently connected (not the number of entries).
    pub fn count_connected(&self) -> usize {
        self.entries
            .lock()
            .expect("connections lock poisoned")
            .values()
            .filter(|&&connected| connected)
            .count()
    }

    /// Full copy of the map, for `/status`.
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.entries
            .lock()
            .expect("connections lock poisoned")
            .clone()
    }

    fn persist(&self, entries: &BTreeMap<String, bool>) {
        if let Err(e) = write_map(&self.path, entries) {
            warn!(path = %self.path.display(), "failed to persist connections: {e}");
        }
    }
}

fn read_map(path: &Path) -> Result<BTreeMap<String, bool>, StoreError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_map(path: &Path, entries: &BTreeMap<String, bool>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
