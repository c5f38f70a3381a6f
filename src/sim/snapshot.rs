//! Render-facing view of the simulation
//!
//! The renderer only needs where each sprite is and how big to draw it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::SimState;

/// Position and scale of one sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub pos: DVec2,
    pub scale: f64,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub collider: SpriteView,
    /// Free-roaming balls in spawn order
    pub balls: Vec<SpriteView>,
    /// Collider position text for the HUD label
    pub readout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_collisions: Option<u64>,
}

impl Snapshot {
    pub fn capture(state: &SimState) -> Self {
        Self {
            tick: state.time_ticks,
            collider: SpriteView {
                pos: state.collider.pos,
                scale: 1.0,
            },
            balls: state
                .balls
                .iter()
                .map(|b| SpriteView {
                    pos: b.pos,
                    scale: b.scale,
                })
                .collect(),
            readout: state.collider.readout(),
            total_collisions: state.total_collisions(),
        }
    }
}
