//! GPIO edge events for the digital joystick.
//!
//! The joystick is five momentary switches wired to GPIO inputs with
//! pull-ups.  The [`EdgeSource`] trait is the hardware seam: it delivers
//! level changes as [`EdgeEvent`]s over a channel, in the same shape whether
//! they come from real pin interrupts ([`rpi::RpiEdgeSource`], feature
//! `rpi-gpio`) or from a test feeding a channel by hand
//! ([`mock::MockEdgeSource`]).
//!
//! Debouncing lives in the consumer ([`joystick::DigitalJoystickPlugin`]),
//! not in the sources, so it is applied identically to real and mock events.

use std::sync::mpsc;

use thiserror::Error;

pub mod joystick;
pub mod mock;

#[cfg(all(target_os = "linux", feature = "rpi-gpio"))]
pub mod rpi;

/// The five physical joystick inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputLine {
    Up,
    Down,
    Left,
    Right,
    Click,
}

/// One level change on one input line.
///
/// `pressed` is the logical switch state: the wiring is active-low
/// (pull-up, switch to ground), and sources translate the electrical level
/// so consumers never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub line: InputLine,
    pub pressed: bool,
}

/// Error type for GPIO access.
#[derive(Debug, Error)]
pub enum GpioError {
    /// The GPIO peripheral or a pin could not be acquired.  A pin already
    /// claimed by another process is fatal at construction time.
    #[error("gpio unavailable: {0}")]
    Acquire(String),
    /// Interrupt registration failed after the pins were claimed.
    #[error("gpio interrupt setup failed: {0}")]
    Interrupt(String),
}

/// Produces edge events from the five joystick lines.
pub trait EdgeSource: Send {
    /// Begins event delivery and returns the receiving end of the event
    /// channel.  Called at most once per `start`/`stop` cycle.
    fn start(&mut self) -> Result<mpsc::Receiver<EdgeEvent>, GpioError>;

    /// Stops event delivery.  The channel sender is dropped so the consumer
    /// sees a disconnect.
    fn stop(&mut self);
}
