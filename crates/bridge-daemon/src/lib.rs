//! # bridge-daemon
//!
//! The hardware-bridge daemon.  It owns the input plugins (digital joystick
//! over GPIO, a microcontroller on a serial port, stub LED/temperature
//! sensors) and the single virtual pointer device, and exposes them to
//! local applications through a permission-gated, loopback-only HTTP API.
//!
//! # Layering
//!
//! ```text
//! domain/          BridgeConfig — plain runtime settings
//! application/     plugin registry, permission rule, shutdown supervisor
//! infrastructure/  pointer, serial link, GPIO joystick, stub plugins,
//!                  JSON state stores, axum HTTP gateway
//! ```
//!
//! Hardware access sits behind traits (`PointerDevice`, `SerialConnector`,
//! `EdgeSource`) so the daemon and its full test suite run without any
//! device attached; the real implementations are compiled in with the
//! `hardware` and `rpi-gpio` cargo features.

pub mod application;
pub mod domain;
pub mod infrastructure;
