//! Daemon domain types: runtime configuration.

pub mod config;

pub use config::{BridgeConfig, JoystickPins};
