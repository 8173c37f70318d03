//! Stub plugins: LED and temperature sensor.
//!
//! These model hardware the board does not actually drive yet.  They hold
//! real state and real status text so the registry, the permission layer,
//! and the HTTP routes can be exercised end to end with deterministic
//! behavior; only the final hardware write is missing.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use bridge_core::{Plugin, PluginDescriptor, PluginState};

/// Simulated reading returned by [`TempPlugin::read_temp`], in Celsius.
const SIMULATED_TEMP_C: f32 = 21.5;

/// Stub LED: remembers the last commanded state.
#[derive(Default)]
pub struct LedPlugin {
    state: PluginState,
    lit: AtomicBool,
}

impl LedPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the LED state.  Pure state + status mutation.
    pub fn set_led(&self, on: bool) {
        self.lit.store(on, Ordering::Relaxed);
        self.state.set_status(if on { "LED on" } else { "LED off" });
        info!(on, "led set");
    }

    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::Relaxed)
    }
}

impl Plugin for LedPlugin {
    fn id(&self) -> &str {
        "led"
    }

    fn name(&self) -> &str {
        "LED"
    }

    fn start(&self) {
        self.state.set_enabled(true);
    }

    fn stop(&self) {
        self.state.set_enabled(false);
    }

    fn describe(&self) -> PluginDescriptor {
        self.state.describe(self.id(), self.name())
    }
}

/// Stub temperature sensor: returns a fixed simulated reading.
#[derive(Default)]
pub struct TempPlugin {
    state: PluginState,
}

impl TempPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current (simulated) temperature in Celsius.
    pub fn read_temp(&self) -> f32 {
        self.state
            .set_status(format!("Read {SIMULATED_TEMP_C} °C"));
        SIMULATED_TEMP_C
    }
}

impl Plugin for TempPlugin {
    fn id(&self) -> &str {
        "temp"
    }

    fn name(&self) -> &str {
        "Temperature"
    }

    fn start(&self) {
        self.state.set_enabled(true);
    }

    fn stop(&self) {
        self.state.set_enabled(false);
    }

    fn describe(&self) -> PluginDescriptor {
        self.state.describe(self.id(), self.name())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
