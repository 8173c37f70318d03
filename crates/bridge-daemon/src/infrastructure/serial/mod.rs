//! Serial link to the companion microcontroller.
//!
//! The microcontroller (an Arduino-class board) streams newline-terminated
//! text frames over USB serial; [`link::SerialLinkPlugin`] discovers the
//! port, reads frames, and drives the virtual pointer from `MOVE`/`CLICK`
//! frames.
//!
//! Two traits form the hardware seam:
//!
//! - [`SerialConnector`] finds and opens a port.  The production
//!   implementation ([`port::SystemSerialConnector`], feature `hardware`)
//!   enumerates OS serial ports; tests use [`mock::MockConnector`].
//! - [`SerialTransport`] is one open connection that yields lines until it
//!   dies.

use thiserror::Error;

pub mod link;
pub mod mock;

#[cfg(feature = "hardware")]
pub mod port;

/// Substrings that identify a likely microcontroller port.
///
/// USB CDC devices enumerate as `ttyACM*`, USB-serial adapters as `ttyUSB*`,
/// and some platforms expose the product string ("Arduino") in the port
/// name.  Matching is case-sensitive on the first two and exact on the
/// third, mirroring how the ports actually appear under Linux.
pub const PORT_HINTS: &[&str] = &["ACM", "USB", "Arduino"];

/// True when `port_name` looks like a microcontroller port.
pub fn matches_hint(port_name: &str) -> bool {
    PORT_HINTS.iter().any(|hint| port_name.contains(hint))
}

/// Error type for the serial link.
#[derive(Debug, Error)]
pub enum SerialError {
    /// Enumeration or open failed.
    #[error("serial port unavailable: {0}")]
    Open(String),
    /// An established connection failed mid-read.  The link drops back to
    /// discovery when it sees this.
    #[error("serial connection lost: {0}")]
    Closed(String),
}

/// One open serial connection, consumed line by line.
///
/// `read_line` blocks up to the port's read timeout.  `Ok(None)` means the
/// timeout elapsed with no complete line (the device is idle, not gone);
/// `Err(Closed)` means the transport is dead and the caller must rediscover.
pub trait SerialTransport: Send {
    fn read_line(&mut self) -> Result<Option<String>, SerialError>;
}

/// Discovers and opens the microcontroller port.
///
/// `Ok(None)` means no matching port is currently attached, which is a
/// normal state, not an error.
pub trait SerialConnector: Send + Sync {
    fn discover_and_open(&self)
        -> Result<Option<(String, Box<dyn SerialTransport>)>, SerialError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_matches_usb_cdc_port() {
        assert!(matches_hint("/dev/ttyACM0"));
    }

    #[test]
    fn test_hint_matches_usb_serial_adapter() {
        assert!(matches_hint("/dev/ttyUSB1"));
    }

    #[test]
    fn test_hint_matches_product_string() {
        assert!(matches_hint("Arduino Uno (COM3)"));
    }

    #[test]
    fn test_hint_rejects_builtin_uart() {
        assert!(!matches_hint("/dev/ttyS0"));
        assert!(!matches_hint("/dev/ttyAMA0"));
    }
}
