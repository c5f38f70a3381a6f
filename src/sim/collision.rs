//! Collision detection and response
//!
//! Walls are tested per axis against the sprite's half extent. Ball-vs-ball
//! uses a circular center-distance test with the half widths as radii, even
//! though the sprites are rectangular.

use glam::DVec2;

use super::state::Bounds;

/// Which axes hit a wall this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    pub x: bool,
    pub y: bool,
}

impl WallHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Leading edge at/over `upper` or trailing edge at/under zero
#[inline]
pub fn touches_wall(pos: f64, half: f64, upper: f64) -> bool {
    pos + half >= upper || pos - half <= 0.0
}

/// Reverse and damp a velocity component, then push the position back
///
/// Returns the new `(pos, vel)` for the axis.
#[inline]
pub fn rebound(pos: f64, vel: f64, decay: f64) -> (f64, f64) {
    let vel = vel * -decay;
    (pos + vel * (1.0 / decay), vel)
}

/// Resolve wall contact on both axes independently
///
/// A corner hit damps both axes.
pub fn resolve_walls(
    pos: &mut DVec2,
    vel: &mut DVec2,
    half: DVec2,
    bounds: &Bounds,
    decay: f64,
) -> WallHit {
    let mut hit = WallHit::default();

    if touches_wall(pos.x, half.x, bounds.width) {
        (pos.x, vel.x) = rebound(pos.x, vel.x, decay);
        hit.x = true;
    }
    if touches_wall(pos.y, half.y, bounds.height) {
        (pos.y, vel.y) = rebound(pos.y, vel.y, decay);
        hit.y = true;
    }

    hit
}

/// Circular overlap test; touching counts as a hit
#[inline]
pub fn circles_overlap(a: DVec2, a_radius: f64, b: DVec2, b_radius: f64) -> bool {
    a_radius + b_radius >= a.distance(b)
}

/// Reflect our velocity and inherit the opponent's (equal masses)
#[inline]
pub fn bounce_velocity(vel: DVec2, opponent_vel: DVec2) -> DVec2 {
    -vel + opponent_vel
}
