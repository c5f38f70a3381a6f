//! Deterministic simulation module
//!
//! All ball physics lives here. This module must stay free of windowing:
//! - Host supplies `dt`, bounds and pointer deltas
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Renderer reads a [`Snapshot`], never the state directly

pub mod collision;
pub mod driver;
pub mod motion;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{WallHit, bounce_velocity, circles_overlap, resolve_walls};
pub use driver::Driver;
pub use motion::{Motion, ScaleTable};
pub use snapshot::{Snapshot, SpriteView};
pub use state::{Body, Bounds, ColliderBall, RandomBall, SimPhase, SimState};
pub use tick::{TickInput, tick};
