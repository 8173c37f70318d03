//! Persisted JSON state.
//!
//! Two small documents, each a flat JSON object rewritten in full on every
//! mutation (no schema version, no append log — the files are tiny and the
//! installer owns their lifecycle):
//!
//! - `connections.json` — `{app_id: bool}`, owned by the bridge.
//! - `installed.json` — `{app_id: version}`, owned by the installer,
//!   read-only here.
//!
//! The catalog file (an `{"apps": [...]}` document) is also installer-owned
//! and read-only.

use thiserror::Error;

pub mod catalog;
pub mod connections;

pub use catalog::CatalogStore;
pub use connections::ConnectionStore;

/// Error type for store I/O.  Mostly logged and swallowed: the in-memory
/// state stays authoritative when the disk misbehaves.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
