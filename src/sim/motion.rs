//! Randomized motion parameters
//!
//! Shared by every free-roaming ball: wall damping, the Gaussian velocity
//! kick and weighted scale draw of a random move, and the optional speed
//! clamp.

use glam::DVec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_distr::Normal;

use crate::settings::{ConfigError, SimConfig};

/// Weighted table of sprite scales
#[derive(Debug, Clone)]
pub struct ScaleTable {
    scales: Vec<f64>,
    index: WeightedIndex<u32>,
}

impl ScaleTable {
    /// Build from `(scale, weight)` pairs
    pub fn new(weights: &[(f64, u32)]) -> Result<Self, ConfigError> {
        let index = WeightedIndex::new(weights.iter().map(|&(_, w)| w))
            .map_err(|e| ConfigError::Invalid(format!("scale_weights: {e}")))?;
        Ok(Self {
            scales: weights.iter().map(|&(s, _)| s).collect(),
            index,
        })
    }

    /// Draw one scale
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.scales[self.index.sample(rng)]
    }
}

/// Per-session motion rules applied by [`RandomBall::update`](super::RandomBall::update)
#[derive(Debug, Clone)]
pub struct Motion {
    /// Wall rebound damping (> 0)
    pub decay: f64,
    /// Optional cap on speed after a kick or bounce
    pub max_speed: Option<f64>,
    /// Redraw a ball's move interval each time it fires
    pub redraw_interval: bool,
    drift: Normal<f64>,
    scales: ScaleTable,
}

impl Motion {
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let drift = Normal::new(0.0, config.drift_stddev)
            .map_err(|e| ConfigError::Invalid(format!("drift_stddev: {e}")))?;
        Ok(Self {
            decay: config.decay,
            max_speed: config.max_speed,
            redraw_interval: config.redraw_move_interval,
            drift,
            scales: ScaleTable::new(&config.scale_weights)?,
        })
    }

    /// Add zero-mean Gaussian noise to each velocity component
    pub fn kick<R: Rng + ?Sized>(&self, vel: DVec2, rng: &mut R) -> DVec2 {
        let kicked = DVec2::new(vel.x + self.drift.sample(rng), vel.y + self.drift.sample(rng));
        self.limit(kicked)
    }

    pub fn draw_scale<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.scales.sample(rng)
    }

    /// Apply the speed clamp, if any
    pub fn limit(&self, vel: DVec2) -> DVec2 {
        match self.max_speed {
            Some(max) => vel.clamp_length_max(max),
            None => vel,
        }
    }
}
