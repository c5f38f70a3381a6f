//! Collider Ball - a pointer-driven ball pushing around a swarm of drifters
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (wall bounces, random drift, collider hits)
//! - `input`: Pointer/keyboard events queued between ticks
//! - `settings`: Data-driven simulation config (JSON)
//! - `logging`: env_logger setup

pub mod input;
pub mod logging;
pub mod settings;
pub mod sim;

pub use input::{InputEvent, InputQueue, InputSender};
pub use settings::{ConfigError, SimConfig};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_HZ: f64 = 120.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f64 = 1.0 / TICK_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest host frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Window dimensions
    pub const WIDTH: f64 = 800.0;
    pub const HEIGHT: f64 = 600.0;

    /// Number of free-roaming balls
    pub const N_BALL: usize = 100;

    /// Red ball sprite size (pixels, scale 1)
    pub const BALL_SIZE: f64 = 20.0;
    /// Blue collider ball sprite size (pixels)
    pub const COLLIDER_SIZE: f64 = 30.0;
    /// Collider spawn point
    pub const COLLIDER_START: (f64, f64) = (100.0, 100.0);

    /// Wall rebound damping
    pub const DECAY: f64 = 0.4;
    /// Stddev of the spawn cloud around the window center
    pub const SPAWN_SPREAD: f64 = 50.0;
    /// Initial speed on each axis (sign is random)
    pub const INITIAL_SPEED: f64 = 0.5;
    /// Stddev of the velocity kick applied on a random move
    pub const DRIFT_STDDEV: f64 = 0.1;

    /// Scale choices and their draw weights
    pub const SCALE_WEIGHTS: [(f64, u32); 4] = [(1.0, 1000), (0.25, 3), (1.5, 5), (2.0, 3)];
}
