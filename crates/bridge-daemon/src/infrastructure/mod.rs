//! Infrastructure for the bridge daemon: hardware seams, JSON state stores,
//! and the HTTP gateway.
//!
//! Real device implementations are selected at compile time via cargo
//! features (`hardware`, `rpi-gpio`); every seam also ships a mock so the
//! daemon and its tests run without any device attached.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::warn;

pub mod gpio;
pub mod http;
pub mod pointer;
pub mod serial;
pub mod store;
pub mod stubs;

/// How long `join_with_timeout` waits for a worker thread before giving up.
pub(crate) const WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Joins a worker thread with a bounded wait.
///
/// Plugin stops are cooperative: the caller sets a stop flag first, then
/// joins here.  A worker that fails to exit within the timeout must not
/// block process shutdown, so we log and let the detached thread die with
/// the process.
pub(crate) fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration, what: &str) {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            warn!("{what} worker did not stop within {timeout:?}; detaching");
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    // The thread has finished; join() only collects it and cannot block.
    if handle.join().is_err() {
        warn!("{what} worker panicked");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
