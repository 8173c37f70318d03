//! Held-flag state and integration math for the digital joystick.
//!
//! The joystick produces four momentary direction signals.  GPIO edge
//! callbacks set the flags asynchronously; a fixed-rate integration loop
//! reads them every tick and converts them into a pointer delta.
//!
//! The flags are plain atomics rather than a mutex-guarded struct: a torn
//! read across flags within a single tick is tolerable (it self-corrects on
//! the next tick, 20 ms later), and per-flag reads are always consistent.

use std::sync::atomic::{AtomicBool, Ordering};

/// One of the four joystick directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Current held state of the four direction inputs.
#[derive(Debug, Default)]
pub struct HeldFlags {
    up: AtomicBool,
    down: AtomicBool,
    left: AtomicBool,
    right: AtomicBool,
}

impl HeldFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current level of one direction input.
    pub fn set(&self, direction: Direction, held: bool) {
        self.flag(direction).store(held, Ordering::Relaxed);
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.flag(direction).load(Ordering::Relaxed)
    }

    /// Clears all four flags (used when the plugin stops).
    pub fn clear(&self) {
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            self.set(d, false);
        }
    }

    /// Computes the pointer delta for one integration tick.
    ///
    /// Opposite directions cancel: both `up` and `down` held yields
    /// `dy == 0`, and likewise for the horizontal axis.  The returned delta
    /// is `(0, 0)` when nothing is held.
    pub fn tick_delta(&self, step: i32) -> (i32, i32) {
        let up = self.is_held(Direction::Up);
        let down = self.is_held(Direction::Down);
        let left = self.is_held(Direction::Left);
        let right = self.is_held(Direction::Right);

        let mut dx = 0;
        let mut dy = 0;

        if up && !down {
            dy -= step;
        } else if down && !up {
            dy += step;
        }

        if left && !right {
            dx -= step;
        } else if right && !left {
            dx += step;
        }

        (dx, dy)
    }

    fn flag(&self, direction: Direction) -> &AtomicBool {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
