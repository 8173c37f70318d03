//! Catalog entries and the privileged-route eligibility rule.
//!
//! The catalog is owned by the external app installer; the bridge only reads
//! it.  Each entry names an application and carries a `plugin` capability
//! flag.  The flag is the literal string `"YES"` for apps allowed to drive
//! hardware through the privileged routes — any other value (or an absent
//! flag) means not allowed.

use serde::{Deserialize, Serialize};

/// One application as described by the external catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Opaque application identifier supplied by callers as `app_id`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// `"YES"` when the app may use privileged plugin routes.
    #[serde(default)]
    pub plugin: String,
}

impl CatalogEntry {
    /// Whether the catalog flags this app as a plugin consumer.
    pub fn allows_plugin(&self) -> bool {
        self.plugin == "YES"
    }
}

/// Per-app connection view reported by `/status` for client UIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectableApp {
    pub id: String,
    pub name: String,
    pub installed: bool,
    pub connected: bool,
}

/// The privileged-route eligibility rule.
///
/// An app may use privileged endpoints only when all three hold
/// simultaneously: it is installed, the catalog flags it `plugin == "YES"`,
/// and it currently declares itself connected.
pub fn is_privileged_eligible(
    entry: Option<&CatalogEntry>,
    installed: bool,
    connected: bool,
) -> bool {
    entry.is_some_and(CatalogEntry::allows_plugin) && installed && connected
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(plugin: &str) -> CatalogEntry {
        CatalogEntry {
            id: "actions".to_string(),
            name: "Actions".to_string(),
            plugin: plugin.to_string(),
        }
    }

    #[test]
    fn test_allows_plugin_requires_exact_yes() {
        assert!(entry("YES").allows_plugin());
        assert!(!entry("NO").allows_plugin());
        assert!(!entry("yes").allows_plugin());
        assert!(!entry("").allows_plugin());
    }

    #[test]
    fn test_eligible_when_all_three_conditions_hold() {
        let e = entry("YES");
        assert!(is_privileged_eligible(Some(&e), true, true));
    }

    #[test]
    fn test_not_eligible_when_not_connected() {
        let e = entry("YES");
        assert!(!is_privileged_eligible(Some(&e), true, false));
    }

    #[test]
    fn test_not_eligible_when_not_installed() {
        let e = entry("YES");
        assert!(!is_privileged_eligible(Some(&e), false, true));
    }

    #[test]
    fn test_not_eligible_when_catalog_flag_missing() {
        let e = entry("NO");
        assert!(!is_privileged_eligible(Some(&e), true, true));
        assert!(!is_privileged_eligible(None, true, true));
    }

    #[test]
    fn test_catalog_entry_deserializes_without_plugin_field() {
        // Older catalog files omit the flag entirely; that means "no".
        let e: CatalogEntry =
            serde_json::from_str(r#"{"id": "editor", "name": "Editor"}"#).unwrap();
        assert!(!e.allows_plugin());
    }
}
