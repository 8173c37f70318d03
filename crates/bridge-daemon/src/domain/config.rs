//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It can be constructed from CLI arguments (preferred for production) or
//! from sensible defaults (useful for local development and tests).
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the daemon easy to embed in
//! tests.  The binary entry point is responsible for populating the struct
//! from CLI args or environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// BCM pin numbers for the five joystick inputs.
///
/// All pins are configured as inputs with internal pull-ups; a pressed
/// switch pulls the line low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickPins {
    pub up: u8,
    pub down: u8,
    pub left: u8,
    pub right: u8,
    pub click: u8,
}

impl Default for JoystickPins {
    fn default() -> Self {
        Self {
            up: 17,
            down: 27,
            left: 22,
            right: 23,
            click: 24,
        }
    }
}

/// All runtime configuration for the bridge daemon.
///
/// Build this struct once at startup and wrap it in an `Arc` so it can be
/// shared cheaply across handler tasks and plugin threads.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// The address the HTTP gateway binds to.  Always loopback in
    /// production; the port is the only part meant to vary.
    pub bind_addr: SocketAddr,

    /// How long to wait after the last client disconnects before the
    /// process terminates itself.  A reconnect within this window cancels
    /// the shutdown.
    pub grace_period: Duration,

    /// Path of the persisted connection map (`{app_id: bool}`).
    pub connections_path: PathBuf,

    /// Path of the installer-owned installed-apps map (`{app_id: version}`).
    /// Read-only from the bridge's perspective.
    pub installed_path: PathBuf,

    /// Path of the installer-owned catalog file.  Read-only.
    pub catalog_path: PathBuf,

    /// Baud rate for the microcontroller serial link.
    pub serial_baud: u32,

    /// Pixels the cursor moves per joystick integration tick.
    pub cursor_step: i32,

    /// Interval of the joystick integration loop.
    pub tick_interval: Duration,

    /// GPIO pin assignment for the joystick.
    pub joystick_pins: JoystickPins,
}

impl Default for BridgeConfig {
    /// Returns a `BridgeConfig` suitable for local development without any
    /// external configuration.
    ///
    /// | Field          | Default              |
    /// |----------------|----------------------|
    /// | bind_addr      | `127.0.0.1:8765`     |
    /// | grace_period   | 5 seconds            |
    /// | serial_baud    | 9600                 |
    /// | cursor_step    | 3 px                 |
    /// | tick_interval  | 20 ms                |
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address string.
            bind_addr: "127.0.0.1:8765".parse().unwrap(),
            grace_period: Duration::from_secs(5),
            connections_path: PathBuf::from("data/connections.json"),
            installed_path: PathBuf::from("data/installed.json"),
            catalog_path: PathBuf::from("data/catalog.json"),
            serial_baud: 9600,
            cursor_step: 3,
            tick_interval: Duration::from_millis(20),
            joystick_pins: JoystickPins::default(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_loopback_only() {
        let cfg = BridgeConfig::default();
        assert!(cfg.bind_addr.ip().is_loopback());
        assert_eq!(cfg.bind_addr.port(), 8765);
    }

    #[test]
    fn test_default_grace_period_is_5s() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.grace_period, Duration::from_secs(5));
    }

    #[test]
    fn test_default_joystick_timing() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.cursor_step, 3);
        assert_eq!(cfg.tick_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_default_pins_match_wiring_diagram() {
        // The default assignment matches the documented joystick wiring.
        let pins = JoystickPins::default();
        assert_eq!(
            (pins.up, pins.down, pins.left, pins.right, pins.click),
            (17, 27, 22, 23, 24)
        );
    }

    #[test]
    fn test_config_can_be_cloned() {
        // Cloneability is required so the config can be captured by plugin
        // constructors and the CLI layer independently.
        let cfg = BridgeConfig::default();
        let cloned = cfg.clone();
        assert_eq!(cfg.bind_addr, cloned.bind_addr);
        assert_eq!(cfg.connections_path, cloned.connections_path);
    }
}
