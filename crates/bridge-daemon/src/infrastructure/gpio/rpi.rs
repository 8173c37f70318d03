//! Real joystick edge source on Raspberry Pi GPIO (feature `rpi-gpio`).
//!
//! Claims the five configured BCM pins as pull-up inputs at construction.
//! A pin already claimed by another process fails construction, which the
//! daemon treats as fatal: silently running without the joystick would be
//! worse than refusing to start.
//!
//! Edges are delivered via rppal async interrupts; the interrupt callbacks
//! only translate the electrical level (active-low) and push onto the event
//! channel, so all debounce and pointer work stays off the interrupt path.

use std::sync::mpsc;

use rppal::gpio::{Gpio, InputPin, Trigger};
use tracing::debug;

use super::{EdgeEvent, EdgeSource, GpioError, InputLine};
use crate::domain::JoystickPins;

/// Translates an interrupt edge into the logical switch state.  The wiring
/// is active-low (pull-up, switch to ground), so a falling edge means the
/// switch went down.
fn is_pressed(trigger: Trigger) -> bool {
    trigger == Trigger::FallingEdge
}

pub struct RpiEdgeSource {
    pins: Vec<(InputLine, InputPin)>,
}

impl RpiEdgeSource {
    /// Claims all five joystick pins.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::Acquire`] when the GPIO peripheral is missing
    /// (not a Pi) or any pin is already claimed.
    pub fn new(pins: JoystickPins) -> Result<Self, GpioError> {
        let gpio = Gpio::new().map_err(|e| GpioError::Acquire(e.to_string()))?;

        let assignment = [
            (InputLine::Up, pins.up),
            (InputLine::Down, pins.down),
            (InputLine::Left, pins.left),
            (InputLine::Right, pins.right),
            (InputLine::Click, pins.click),
        ];

        let mut claimed = Vec::with_capacity(assignment.len());
        for (line, bcm) in assignment {
            let pin = gpio
                .get(bcm)
                .map_err(|e| GpioError::Acquire(format!("pin {bcm}: {e}")))?
                .into_input_pullup();
            debug!(?line, bcm, "claimed joystick pin");
            claimed.push((line, pin));
        }
        Ok(Self { pins: claimed })
    }
}

impl EdgeSource for RpiEdgeSource {
    fn start(&mut self) -> Result<mpsc::Receiver<EdgeEvent>, GpioError> {
        let (sender, receiver) = mpsc::channel();

        for (line, pin) in &mut self.pins {
            let line = *line;
            // Directions need both edges (press and release); the click
            // line only acts on press, so the falling edge suffices.
            let trigger = match line {
                InputLine::Click => Trigger::FallingEdge,
                _ => Trigger::Both,
            };
            let sender = sender.clone();
            // No driver-level debounce: the listener debounces per line so
            // real and mock events go through the same filter.
            pin.set_async_interrupt(trigger, None, move |event| {
                let _ = sender.send(EdgeEvent {
                    line,
                    pressed: is_pressed(event.trigger),
                });
            })
            .map_err(|e| GpioError::Interrupt(e.to_string()))?;
        }
        Ok(receiver)
    }

    fn stop(&mut self) {
        for (_, pin) in &mut self.pins {
            // Failure here means the interrupt was never set; nothing to do.
            let _ = pin.clear_async_interrupt();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // Hardware construction needs a Pi; only the edge translation is
    // testable on a build host.

    #[test]
    fn test_falling_edge_means_pressed() {
        assert!(is_pressed(Trigger::FallingEdge));
    }

    #[test]
    fn test_rising_edge_means_released() {
        assert!(!is_pressed(Trigger::RisingEdge));
    }
}
