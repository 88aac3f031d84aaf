//! Fearwater - a grid-based stealth game
//!
//! Core modules:
//! - `sim`: Deterministic game core (geometry, cameras, input, state machine)
//! - `persistence`: Progress storage (deaths, best run, last level)
//! - `settings`: Data-driven gameplay tuning

pub mod persistence;
pub mod settings;
pub mod sim;

pub use persistence::{Data, KeyValueStore, MemoryStorage};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the host loop
    pub const FPS: u32 = 30;
    /// Frame length at the target rate (ms)
    pub const FRAME_MS: f64 = 1000.0 / FPS as f64;

    /// Cell size used when a level does not set one
    pub const DEFAULT_GRID_SIZE: f32 = 48.0;

    /// Hole glow pulse divisor (ms per radian)
    pub const HOLE_PULSE_PERIOD_MS: f64 = 200.0;
}
