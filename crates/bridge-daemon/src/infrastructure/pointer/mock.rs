//! Mock pointer device for unit testing.
//!
//! The real pointer implementation creates an OS-level uinput device that:
//!
//! - Requires `/dev/uinput` access and a Linux kernel to run.
//! - Actually moves the cursor on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! `MockPointer` replaces the OS calls with in-memory recording.  Each
//! emission is pushed into a `Mutex<Vec<...>>` so assertions can inspect
//! exactly what was emitted and in what order.
//!
//! # `should_fail` flag
//!
//! Construct with [`MockPointer::failing`] to make every method return a
//! [`PointerError::Emit`].  This exercises error-handling paths in callers
//! without needing a broken device.

use std::sync::Mutex;

use super::{PointerDevice, PointerError};

/// A pointer device that records all calls without touching the OS.
#[derive(Default)]
pub struct MockPointer {
    /// Records each `(dx, dy)` pair passed to `move_rel`.
    moves: Mutex<Vec<(i32, i32)>>,
    /// Counts calls to `click`.
    clicks: Mutex<u32>,
    /// When `true`, every method immediately returns a `PointerError::Emit`.
    should_fail: bool,
}

impl MockPointer {
    /// Creates a recording pointer that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pointer whose every emission fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of all recorded moves, in emission order.
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.moves.lock().unwrap().clone()
    }

    /// Number of clicks emitted so far.
    pub fn clicks(&self) -> u32 {
        *self.clicks.lock().unwrap()
    }
}

impl PointerDevice for MockPointer {
    fn move_rel(&self, dx: i32, dy: i32) -> Result<(), PointerError> {
        if self.should_fail {
            return Err(PointerError::Emit("mock failure".into()));
        }
        self.moves.lock().unwrap().push((dx, dy));
        Ok(())
    }

    fn click(&self) -> Result<(), PointerError> {
        if self.should_fail {
            return Err(PointerError::Emit("mock failure".into()));
        }
        *self.clicks.lock().unwrap() += 1;
        Ok(())
    }
}
