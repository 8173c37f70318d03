//! Pure domain logic with no OS dependencies.

pub mod catalog;
pub mod joystick;
pub mod plugin;
