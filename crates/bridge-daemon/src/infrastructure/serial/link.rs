//! The serial-link plugin: microcontroller frames in, pointer events out.
//!
//! `start` discovers the port synchronously, then hands the open transport
//! to a dedicated read thread.  The thread blocks on `read_line` with the
//! port's short timeout so it can notice the stop flag between frames, and
//! it exits on its own when the transport dies.
//!
//! Every received line is kept as a raw diagnostic (`last_line`) regardless
//! of whether it decoded to a pointer action, so `/status` can show exactly
//! what the board last said.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use bridge_core::{Plugin, PluginDescriptor, PluginState, SerialFrame};

use super::{SerialConnector, SerialError, SerialTransport};
use crate::infrastructure::pointer::VirtualPointer;
use crate::infrastructure::{join_with_timeout, WORKER_JOIN_TIMEOUT};

/// Pause after a transient read error before retrying.
const READ_BACKOFF: Duration = Duration::from_millis(100);

/// Plugin driving the virtual pointer from microcontroller serial frames.
pub struct SerialLinkPlugin {
    // Shared with the read thread, which writes status text after `start`
    // has returned.
    state: Arc<PluginState>,
    connector: Arc<dyn SerialConnector>,
    pointer: Arc<VirtualPointer>,
    last_line: Arc<Mutex<Option<String>>>,
    stop: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SerialLinkPlugin {
    pub fn new(connector: Arc<dyn SerialConnector>, pointer: Arc<VirtualPointer>) -> Self {
        Self {
            state: Arc::new(PluginState::new("not found")),
            connector,
            pointer,
            last_line: Arc::new(Mutex::new(None)),
            stop: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// The raw text of the most recent frame, for `/status`.
    pub fn last_line(&self) -> Option<String> {
        self.last_line
            .lock()
            .expect("last_line lock poisoned")
            .clone()
    }
}

impl Plugin for SerialLinkPlugin {
    fn id(&self) -> &str {
        "serial"
    }

    fn name(&self) -> &str {
        "Serial Link"
    }

    fn start(&self) {
        let mut worker = self.worker.lock().expect("worker lock poisoned");
        if worker.as_ref().is_some_and(|h| !h.is_finished()) {
            // Already running; start is idempotent.
            return;
        }

        let (port_name, transport) = match self.connector.discover_and_open() {
            Ok(Some(found)) => found,
            Ok(None) => {
                info!("no serial device found");
                self.state.set_status("not found");
                return;
            }
            Err(e) => {
                warn!("serial open failed: {e}");
                self.state.set_status("Serial error");
                return;
            }
        };

        info!(port = %port_name, "serial device connected");
        self.state.set_status(format!("Connected on {port_name}"));
        self.state.set_enabled(true);
        self.stop.store(false, Ordering::Relaxed);

        let read_loop = ReadLoop {
            transport,
            pointer: Arc::clone(&self.pointer),
            last_line: Arc::clone(&self.last_line),
            stop: Arc::clone(&self.stop),
            state: Arc::clone(&self.state),
        };
        *worker = Some(std::thread::spawn(move || read_loop.run()));
    }

    fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        let Some(handle) = self.worker.lock().expect("worker lock poisoned").take() else {
            // Never started (no device found, or open failed): keep the
            // discovery diagnostic in place.
            return;
        };
        join_with_timeout(handle, WORKER_JOIN_TIMEOUT, "serial link");
        self.state.set_enabled(false);
        self.state.set_status("Idle");
        info!("serial link stopped");
    }

    fn describe(&self) -> PluginDescriptor {
        self.state.describe(self.id(), self.name())
    }
}

/// Consumes frames from one open transport until stopped or disconnected.
struct ReadLoop {
    transport: Box<dyn SerialTransport>,
    pointer: Arc<VirtualPointer>,
    last_line: Arc<Mutex<Option<String>>>,
    stop: Arc<AtomicBool>,
    state: Arc<PluginState>,
}

impl ReadLoop {
    fn run(mut self) {
        while !self.stop.load(Ordering::Relaxed) {
            match self.transport.read_line() {
                Ok(Some(line)) => self.handle_line(&line),
                // Idle timeout: loop around so the stop flag is re-checked.
                Ok(None) => {}
                Err(SerialError::Closed(reason)) => {
                    warn!("serial transport closed: {reason}");
                    self.state.set_status("Serial error");
                    return;
                }
                Err(e) => {
                    warn!("serial read error: {e}");
                    self.state.set_status("Serial error");
                    std::thread::sleep(READ_BACKOFF);
                }
            }
        }
    }

    fn handle_line(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        debug!(line, "serial frame received");
        *self.last_line.lock().expect("last_line lock poisoned") = Some(line.to_string());
        self.state.set_status(format!("Data: {line}"));

        match SerialFrame::parse(line) {
            SerialFrame::Move { dx, dy } => {
                if let Err(e) = self.pointer.move_rel(dx, dy) {
                    warn!("pointer move failed: {e}");
                }
            }
            SerialFrame::Click => {
                if let Err(e) = self.pointer.click() {
                    warn!("pointer click failed: {e}");
                }
            }
            // Telemetry or noise: diagnostic only, no hardware effect.
            SerialFrame::Unrecognized => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pointer::mock::MockPointer;
    use crate::infrastructure::pointer::PointerDevice;
    use crate::infrastructure::serial::mock::{MockConnector, MockTransport, Step};

    fn plugin_with(
        connector: MockConnector,
    ) -> (SerialLinkPlugin, Arc<MockPointer>) {
        let device = Arc::new(MockPointer::new());
        let pointer = Arc::new(VirtualPointer::new(
            Arc::clone(&device) as Arc<dyn PointerDevice>
        ));
        (SerialLinkPlugin::new(Arc::new(connector), pointer), device)
    }

    fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) {
        let deadline = std::time::Instant::now() + timeout;
        while !done() {
            assert!(
                std::time::Instant::now() < deadline,
                "condition not reached within {timeout:?}"
            );
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_start_without_device_reports_not_found() {
        let (plugin, device) = plugin_with(MockConnector::empty());

        plugin.start();

        let desc = plugin.describe();
        assert!(!desc.enabled);
        assert_eq!(desc.status, "not found");
        assert!(device.moves().is_empty());
    }

    #[test]
    fn test_move_and_click_frames_drive_pointer() {
        let transport = MockTransport::new(vec![
            Step::Line("MOVE 4 -2"),
            Step::Line("CLICK"),
            Step::Closed,
        ]);
        let (plugin, device) = plugin_with(MockConnector::new(vec![transport]));

        plugin.start();
        wait_until(Duration::from_secs(2), || device.clicks() == 1);
        plugin.stop();

        assert_eq!(device.moves(), vec![(4, -2)]);
        assert_eq!(device.clicks(), 1);
    }

    #[test]
    fn test_oversized_move_is_clamped() {
        let transport = MockTransport::new(vec![Step::Line("MOVE 500 -500"), Step::Closed]);
        let (plugin, device) = plugin_with(MockConnector::new(vec![transport]));

        plugin.start();
        wait_until(Duration::from_secs(2), || !device.moves().is_empty());
        plugin.stop();

        assert_eq!(device.moves(), vec![(20, -20)]);
    }

    #[test]
    fn test_unrecognized_line_is_diagnostic_only() {
        let transport = MockTransport::new(vec![Step::Line("TEMP 21.5"), Step::Closed]);
        let (plugin, device) = plugin_with(MockConnector::new(vec![transport]));

        plugin.start();
        wait_until(Duration::from_secs(2), || plugin.last_line().is_some());
        plugin.stop();

        assert_eq!(plugin.last_line().as_deref(), Some("TEMP 21.5"));
        assert!(device.moves().is_empty());
        assert_eq!(device.clicks(), 0);
    }

    #[test]
    fn test_malformed_move_is_discarded() {
        let transport = MockTransport::new(vec![
            Step::Line("MOVE abc 3"),
            Step::Line("MOVE 1"),
            Step::Closed,
        ]);
        let (plugin, device) = plugin_with(MockConnector::new(vec![transport]));

        plugin.start();
        wait_until(Duration::from_secs(2), || {
            plugin.last_line().as_deref() == Some("MOVE 1")
        });
        plugin.stop();

        assert!(device.moves().is_empty());
    }

    #[test]
    fn test_transport_death_sets_error_status() {
        let transport = MockTransport::new(vec![Step::Line("MOVE 1 1"), Step::Closed]);
        let (plugin, _device) = plugin_with(MockConnector::new(vec![transport]));

        plugin.start();
        wait_until(Duration::from_secs(2), || {
            plugin.describe().status == "Serial error"
        });
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (plugin, _device) = plugin_with(MockConnector::empty());
        plugin.start();
        plugin.stop();
        plugin.stop();
        assert!(!plugin.describe().enabled);
    }

    #[test]
    fn test_stop_without_device_keeps_not_found_status() {
        let (plugin, _device) = plugin_with(MockConnector::empty());

        plugin.start();
        plugin.stop();

        // Stop on a plugin that never ran must not erase the discovery
        // diagnostic.
        let desc = plugin.describe();
        assert!(!desc.enabled);
        assert_eq!(desc.status, "not found");
    }

    #[test]
    fn test_stop_after_session_resets_to_idle() {
        let transport = MockTransport::new(vec![Step::Line("MOVE 1 1"), Step::Idle]);
        let (plugin, device) = plugin_with(MockConnector::new(vec![transport]));

        plugin.start();
        wait_until(Duration::from_secs(2), || !device.moves().is_empty());
        plugin.stop();

        let desc = plugin.describe();
        assert!(!desc.enabled);
        assert_eq!(desc.status, "Idle");
    }
}
