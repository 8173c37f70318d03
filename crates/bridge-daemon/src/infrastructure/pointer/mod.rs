//! The virtual pointer device: the sole writer of pointer motion and click
//! events.
//!
//! The OS-level emission device is a single shared resource written from at
//! least three independent contexts (the serial read loop, the joystick
//! integration loop, and privileged HTTP handlers).  [`VirtualPointer`]
//! serializes every emission behind one mutex so a `MOVE`'s X/Y pair or a
//! click's press/release pair can never interleave with another caller's
//! events.
//!
//! The [`PointerDevice`] trait is the hardware seam: the production
//! implementation ([`uinput::UinputPointer`], feature `hardware`) creates a
//! Linux uinput device with `REL_X`/`REL_Y`/`BTN_LEFT`; tests use
//! [`mock::MockPointer`] which records every call in memory.

use std::sync::{Arc, Mutex};

use thiserror::Error;

pub mod mock;

#[cfg(all(target_os = "linux", feature = "hardware"))]
pub mod uinput;

/// Error type for pointer emission.
#[derive(Debug, Error)]
pub enum PointerError {
    /// The underlying device could not be created.  Raised at startup only;
    /// the bridge fails fast because there is no fallback pointer path.
    #[error("failed to open virtual pointer device: {0}")]
    Open(String),
    /// An emission failed after the device was opened.
    #[error("pointer emission failed: {0}")]
    Emit(String),
}

/// Low-level pointer emission, implemented per platform.
///
/// Methods take `&self` with interior mutability so one instance can be
/// shared as `Arc<dyn PointerDevice>`; callers must still hold the
/// [`VirtualPointer`] emission lock, because implementations do not
/// serialize multi-event emissions themselves.
pub trait PointerDevice: Send + Sync {
    /// Emits a relative displacement.
    fn move_rel(&self, dx: i32, dy: i32) -> Result<(), PointerError>;

    /// Emits a left-button press immediately followed by a release.
    fn click(&self) -> Result<(), PointerError>;
}

/// The single virtual pointer shared by every input path.
pub struct VirtualPointer {
    device: Arc<dyn PointerDevice>,
    /// Guards the emission sequence, not the device fields: held for the
    /// full duration of one `move_rel` or `click` so emissions from
    /// different threads never interleave mid-event.
    emit_lock: Mutex<()>,
}

impl VirtualPointer {
    pub fn new(device: Arc<dyn PointerDevice>) -> Self {
        Self {
            device,
            emit_lock: Mutex::new(()),
        }
    }

    /// Emits a relative pointer displacement.  Fire-and-forget: callers on
    /// hardware paths log failures instead of propagating them.
    pub fn move_rel(&self, dx: i32, dy: i32) -> Result<(), PointerError> {
        let _guard = self.emit_lock.lock().expect("pointer lock poisoned");
        self.device.move_rel(dx, dy)
    }

    /// Emits a left-button click.
    pub fn click(&self) -> Result<(), PointerError> {
        let _guard = self.emit_lock.lock().expect("pointer lock poisoned");
        self.device.click()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::MockPointer;
    use super::*;

    #[test]
    fn test_move_rel_forwards_to_device() {
        let device = Arc::new(MockPointer::new());
        let pointer = VirtualPointer::new(Arc::clone(&device) as Arc<dyn PointerDevice>);

        pointer.move_rel(3, -2).unwrap();

        assert_eq!(device.moves(), vec![(3, -2)]);
    }

    #[test]
    fn test_click_forwards_to_device() {
        let device = Arc::new(MockPointer::new());
        let pointer = VirtualPointer::new(Arc::clone(&device) as Arc<dyn PointerDevice>);

        pointer.click().unwrap();
        pointer.click().unwrap();

        assert_eq!(device.clicks(), 2);
    }

    #[test]
    fn test_device_failure_propagates() {
        let device = Arc::new(MockPointer::failing());
        let pointer = VirtualPointer::new(Arc::clone(&device) as Arc<dyn PointerDevice>);

        assert!(pointer.move_rel(1, 1).is_err());
        assert!(pointer.click().is_err());
        assert!(device.moves().is_empty());
    }

    #[test]
    fn test_concurrent_emissions_are_all_recorded() {
        let device = Arc::new(MockPointer::new());
        let pointer = Arc::new(VirtualPointer::new(
            Arc::clone(&device) as Arc<dyn PointerDevice>
        ));

        let mut handles = Vec::new();
        for i in 0..4 {
            let p = Arc::clone(&pointer);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    p.move_rel(i, i).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(device.moves().len(), 100);
    }
}
