//! Real serial transport over OS serial ports (feature `hardware`).
//!
//! Uses the `serialport` crate for enumeration and I/O.  The port is opened
//! with a 1 second read timeout so the read loop can poll its stop flag
//! even when the board is silent.

use std::io::Read;
use std::time::Duration;

use serialport::SerialPortType;
use tracing::debug;

use super::{matches_hint, SerialConnector, SerialError, SerialTransport};

const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Opens the first enumerated port that looks like a microcontroller.
pub struct SystemSerialConnector {
    baud: u32,
}

impl SystemSerialConnector {
    pub fn new(baud: u32) -> Self {
        Self { baud }
    }
}

impl SerialConnector for SystemSerialConnector {
    fn discover_and_open(
        &self,
    ) -> Result<Option<(String, Box<dyn SerialTransport>)>, SerialError> {
        let ports = serialport::available_ports().map_err(|e| SerialError::Open(e.to_string()))?;

        for port in ports {
            // Match on the device path, or on the USB product string when
            // the OS exposes one.
            let product_matches = match &port.port_type {
                SerialPortType::UsbPort(usb) => usb
                    .product
                    .as_deref()
                    .is_some_and(matches_hint),
                _ => false,
            };
            if !matches_hint(&port.port_name) && !product_matches {
                debug!(port = %port.port_name, "skipping non-matching port");
                continue;
            }

            let opened = serialport::new(&port.port_name, self.baud)
                .timeout(READ_TIMEOUT)
                .open()
                .map_err(|e| SerialError::Open(e.to_string()))?;
            return Ok(Some((
                port.port_name,
                Box::new(SystemSerialTransport {
                    port: opened,
                    buffer: Vec::new(),
                }),
            )));
        }
        Ok(None)
    }
}

/// Line-oriented reader over one open port.
struct SystemSerialTransport {
    port: Box<dyn serialport::SerialPort>,
    /// Bytes received so far that do not yet form a complete line.  Kept
    /// across timeouts so a frame split over two reads is not lost.
    buffer: Vec<u8>,
}

impl SerialTransport for SystemSerialTransport {
    fn read_line(&mut self) -> Result<Option<String>, SerialError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                // Boards send ASCII; anything else is replaced, not fatal.
                return Ok(Some(String::from_utf8_lossy(&line).trim().to_string()));
            }

            let mut chunk = [0u8; 256];
            match self.port.read(&mut chunk) {
                Ok(0) => return Err(SerialError::Closed("port reached EOF".into())),
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(SerialError::Closed(e.to_string())),
            }
        }
    }
}
