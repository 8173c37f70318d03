//! Decoding of the microcontroller's newline-delimited ASCII protocol.
//!
//! The device sends one command per line:
//!
//! ```text
//! MOVE <dx> <dy>    relative pointer motion, signed integers
//! CLICK             left-button click
//! ```
//!
//! Anything else is recorded by the caller as a diagnostic but produces no
//! hardware effect.  A `MOVE` whose arguments do not parse as integers (or
//! whose argument count is wrong) is likewise inert — a misbehaving sketch
//! on the microcontroller must never crash the bridge or move the pointer
//! in an unintended way.
//!
//! # Safety clamping
//!
//! Motion deltas are clamped before they ever reach the pointer device.
//! The serial path clamps to [`SERIAL_MOVE_LIMIT`] and the HTTP path to
//! [`API_MOVE_LIMIT`].  The two limits differ in the observed device
//! firmware and are deliberately kept as two separate constants.

/// Maximum per-axis displacement accepted from a serial `MOVE` command.
pub const SERIAL_MOVE_LIMIT: i32 = 20;

/// Maximum per-axis displacement accepted from the HTTP `/mouse/move` route.
pub const API_MOVE_LIMIT: i32 = 50;

/// Clamps a single-axis delta to the inclusive range `[-limit, limit]`.
///
/// Values already within range pass through unchanged.
pub fn clamp_delta(value: i32, limit: i32) -> i32 {
    value.clamp(-limit, limit)
}

/// One decoded line from the microcontroller.
///
/// Frames are transient: they are produced and consumed inside the serial
/// read loop and never stored beyond the plugin's last-seen-line diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialFrame {
    /// `MOVE <dx> <dy>` with both deltas already clamped to
    /// [`SERIAL_MOVE_LIMIT`].
    Move { dx: i32, dy: i32 },
    /// `CLICK` — a left-button press followed by release.
    Click,
    /// Any other line, including a `MOVE` with malformed arguments.
    /// Recorded for diagnostics, no hardware effect.
    Unrecognized,
}

impl SerialFrame {
    /// Decodes one newline-stripped line.
    ///
    /// Returns [`SerialFrame::Unrecognized`] for any line that must not
    /// drive the pointer: unknown command tags, a `MOVE` with the wrong
    /// number of arguments, or non-integer delta tokens.
    pub fn parse(line: &str) -> SerialFrame {
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("MOVE") => {
                let dx = parts.next().and_then(|t| t.parse::<i32>().ok());
                let dy = parts.next().and_then(|t| t.parse::<i32>().ok());
                // Exactly two integer arguments, nothing trailing.
                match (dx, dy, parts.next()) {
                    (Some(dx), Some(dy), None) => SerialFrame::Move {
                        dx: clamp_delta(dx, SERIAL_MOVE_LIMIT),
                        dy: clamp_delta(dy, SERIAL_MOVE_LIMIT),
                    },
                    _ => SerialFrame::Unrecognized,
                }
            }
            Some("CLICK") => SerialFrame::Click,
            _ => SerialFrame::Unrecognized,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
