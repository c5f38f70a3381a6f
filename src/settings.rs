//! Simulation settings
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are fine.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Bounds;

/// Errors raised while loading or validating a [`SimConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World bounds (window size)
    pub bounds: Bounds,
    /// Number of free-roaming balls
    pub ball_count: usize,
    /// RNG seed; `None` picks one from the clock at startup
    pub seed: Option<u64>,

    // === Physics ===
    /// Wall rebound damping, must be > 0
    pub decay: f64,
    /// Stddev of the spawn cloud around the window center
    pub spawn_spread: f64,
    /// Initial per-axis speed (sign is random)
    pub initial_speed: f64,
    /// Stddev of the random-move velocity kick
    pub drift_stddev: f64,
    /// Optional speed clamp, off by default
    pub max_speed: Option<f64>,
    /// Redraw each ball's random-move interval after it fires
    pub redraw_move_interval: bool,
    /// `(scale, weight)` pairs for the random-move scale draw
    pub scale_weights: Vec<(f64, u32)>,

    // === Entities ===
    /// Free-roaming ball sprite size at scale 1
    pub ball_size: DVec2,
    /// Collider sprite size
    pub collider_size: DVec2,
    /// Collider spawn point
    pub collider_start: DVec2,
    /// Keep a per-ball count of collider hits
    pub track_collisions: bool,

    // === Timing ===
    /// Fixed tick rate
    pub tick_hz: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(WIDTH, HEIGHT),
            ball_count: N_BALL,
            seed: None,

            decay: DECAY,
            spawn_spread: SPAWN_SPREAD,
            initial_speed: INITIAL_SPEED,
            drift_stddev: DRIFT_STDDEV,
            max_speed: None,
            redraw_move_interval: false,
            scale_weights: SCALE_WEIGHTS.to_vec(),

            ball_size: DVec2::splat(BALL_SIZE),
            collider_size: DVec2::splat(COLLIDER_SIZE),
            collider_start: DVec2::new(COLLIDER_START.0, COLLIDER_START.1),
            track_collisions: true,

            tick_hz: TICK_HZ,
        }
    }
}

impl SimConfig {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed timestep derived from `tick_hz`
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_hz
    }

    /// Reject values that would break the physics
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Zero decay divides by zero in the wall nudge; negative flips the bounce
        if !(self.decay.is_finite() && self.decay > 0.0) {
            return Err(invalid(format!("decay must be > 0, got {}", self.decay)));
        }
        if !(self.bounds.width > 0.0 && self.bounds.height > 0.0) {
            return Err(invalid(format!(
                "bounds must be positive, got {}x{}",
                self.bounds.width, self.bounds.height
            )));
        }
        if !(self.ball_size.min_element() > 0.0 && self.collider_size.min_element() > 0.0) {
            return Err(invalid("sprite sizes must be positive".to_string()));
        }
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(invalid(format!("tick_hz must be > 0, got {}", self.tick_hz)));
        }
        if !(self.spawn_spread.is_finite() && self.spawn_spread >= 0.0) {
            return Err(invalid(format!(
                "spawn_spread must be >= 0, got {}",
                self.spawn_spread
            )));
        }
        if !(self.drift_stddev.is_finite() && self.drift_stddev >= 0.0) {
            return Err(invalid(format!(
                "drift_stddev must be >= 0, got {}",
                self.drift_stddev
            )));
        }
        if !self.initial_speed.is_finite() {
            return Err(invalid("initial_speed must be finite".to_string()));
        }
        if let Some(max) = self.max_speed
            && (max.is_nan() || max <= 0.0)
        {
            return Err(invalid(format!("max_speed must be > 0, got {max}")));
        }
        if self.scale_weights.is_empty() || self.scale_weights.iter().all(|&(_, w)| w == 0) {
            return Err(invalid("scale_weights needs a non-zero weight".to_string()));
        }
        if let Some(&(scale, _)) = self
            .scale_weights
            .iter()
            .find(|&&(s, _)| s.is_nan() || s <= 0.0)
        {
            return Err(invalid(format!("scales must be > 0, got {scale}")));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
