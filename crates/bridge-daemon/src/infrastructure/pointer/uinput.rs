//! Linux virtual pointer via the uinput subsystem.
//!
//! uinput lets a userspace process create a kernel input device and inject
//! events through it.  The injected events are indistinguishable from a
//! physical mouse, which makes this path display-server-agnostic: it works
//! under both X11 and Wayland, unlike XTest-style injection.
//!
//! The device registers only what the bridge emits: `REL_X`, `REL_Y`, and
//! `BTN_LEFT`.
//!
//! # Permissions
//!
//! Creating the device requires write access to `/dev/uinput` (typically
//! the `input` group, or a udev rule).  When access is denied the
//! constructor fails and the bridge exits — there is no fallback pointer
//! path.

use std::sync::Mutex;

use uinput::event::controller::Mouse;
use uinput::event::relative::Position;

use super::{PointerDevice, PointerError};

/// Production pointer device backed by a kernel uinput device.
pub struct UinputPointer {
    // uinput's emission methods take `&mut self`; the device handle lives
    // behind its own mutex so `PointerDevice` can stay `&self`.  Callers
    // additionally hold the `VirtualPointer` emission lock.
    device: Mutex<uinput::Device>,
}

impl UinputPointer {
    /// Creates the uinput device.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::Open`] when `/dev/uinput` is missing or not
    /// writable, or when the kernel rejects the device definition.
    pub fn create() -> Result<Self, PointerError> {
        let device = uinput::default()
            .map_err(|e| PointerError::Open(e.to_string()))?
            .name("hardware-bridge pointer")
            .map_err(|e| PointerError::Open(e.to_string()))?
            .event(Mouse::Left)
            .map_err(|e| PointerError::Open(e.to_string()))?
            .event(Position::X)
            .map_err(|e| PointerError::Open(e.to_string()))?
            .event(Position::Y)
            .map_err(|e| PointerError::Open(e.to_string()))?
            .create()
            .map_err(|e| PointerError::Open(e.to_string()))?;

        Ok(Self {
            device: Mutex::new(device),
        })
    }
}

impl PointerDevice for UinputPointer {
    fn move_rel(&self, dx: i32, dy: i32) -> Result<(), PointerError> {
        let mut device = self.device.lock().expect("uinput lock poisoned");
        device
            .send(Position::X, dx)
            .and_then(|_| device.send(Position::Y, dy))
            .and_then(|_| device.synchronize())
            .map_err(|e| PointerError::Emit(e.to_string()))
    }

    fn click(&self) -> Result<(), PointerError> {
        let mut device = self.device.lock().expect("uinput lock poisoned");
        device
            .click(&Mouse::Left)
            .and_then(|_| device.synchronize())
            .map_err(|e| PointerError::Emit(e.to_string()))
    }
}
