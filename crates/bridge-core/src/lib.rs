//! # bridge-core
//!
//! Shared library for the hardware bridge containing the serial line
//! protocol, the plugin contract, and the pure joystick/eligibility logic.
//!
//! This crate is used by the daemon binary and by its tests.  It has zero
//! dependencies on OS APIs, HTTP frameworks, or hardware crates.
//!
//! # Architecture overview
//!
//! The hardware bridge is a local daemon that owns a handful of input
//! plugins (a GPIO joystick, a microcontroller on a serial port, stub
//! LED/temperature sensors) and one virtual pointer device, and exposes
//! them to local applications over a permission-gated HTTP API.
//!
//! This crate (`bridge-core`) is the foundation.  It defines:
//!
//! - **`protocol`** – The newline-delimited ASCII protocol spoken by the
//!   microcontroller (`MOVE dx dy`, `CLICK`) and the motion clamping
//!   constants for both the serial and the HTTP path.
//!
//! - **`domain`** – Pure business logic: the [`Plugin`] trait every
//!   capability module implements, the held-flag integration math for the
//!   joystick, and the catalog eligibility rule for privileged API calls.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `bridge_core::SerialFrame` instead of `bridge_core::protocol::frame::SerialFrame`.
pub use domain::catalog::{is_privileged_eligible, CatalogEntry, ConnectableApp};
pub use domain::joystick::{Direction, HeldFlags};
pub use domain::plugin::{Plugin, PluginDescriptor, PluginState};
pub use protocol::frame::{clamp_delta, SerialFrame, API_MOVE_LIMIT, SERIAL_MOVE_LIMIT};
