//! Simulation state and entity types

use std::time::{SystemTime, UNIX_EPOCH};

use glam::DVec2;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{bounce_velocity, circles_overlap, resolve_walls};
use super::motion::Motion;
use crate::settings::{ConfigError, SimConfig};

/// World bounds (window size). Origin is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Anything with a position, a size and a velocity
pub trait Body {
    fn pos(&self) -> DVec2;
    fn vel(&self) -> DVec2;
    /// Half of the sprite's width/height, always > 0
    fn half_extent(&self) -> DVec2;
}

/// An autonomously drifting, bouncing ball
#[derive(Debug, Clone, PartialEq)]
pub struct RandomBall {
    pub id: u32,
    pub pos: DVec2,
    /// Per-tick displacement (pixels)
    pub vel: DVec2,
    /// Sprite scale, redrawn on random moves
    pub scale: f64,
    /// Sprite size at scale 1
    pub base_size: DVec2,
    /// Seconds accumulated since spawn (never decreases)
    pub clock: f64,
    /// `clock` at the last random move
    pub last_move: f64,
    /// Seconds between random moves, drawn from [0, 1)
    pub move_interval: f64,
    /// Collider hits so far, when counting is enabled
    pub collision_count: Option<u64>,
}

impl RandomBall {
    pub fn new(id: u32, pos: DVec2, vel: DVec2, base_size: DVec2, move_interval: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            scale: 1.0,
            base_size,
            clock: 0.0,
            last_move: 0.0,
            move_interval,
            collision_count: None,
        }
    }

    /// Enable the collider hit counter
    pub fn with_collision_count(mut self) -> Self {
        self.collision_count = Some(0);
        self
    }

    /// Advance one tick against `opponent`
    ///
    /// Order matters: walls, then random drift, then the opponent bounce
    /// (which also nudges the position), then integration.
    pub fn update<B, R>(&mut self, dt: f64, opponent: &B, bounds: &Bounds, motion: &Motion, rng: &mut R)
    where
        B: Body + ?Sized,
        R: Rng + ?Sized,
    {
        let half = self.half_extent();
        let walls = resolve_walls(&mut self.pos, &mut self.vel, half, bounds, motion.decay);
        if walls.any() {
            log::trace!("ball {} hit wall {:?}, vel now {}", self.id, walls, self.vel);
        }

        self.process_random_move(dt, motion, rng);
        self.process_collision(opponent, motion);

        self.pos += self.vel;
    }

    /// Accumulate `dt` and fire a random move once the interval has elapsed
    pub fn process_random_move<R: Rng + ?Sized>(&mut self, dt: f64, motion: &Motion, rng: &mut R) -> bool {
        self.clock += dt.max(0.0);
        if self.clock - self.last_move <= self.move_interval {
            return false;
        }

        self.last_move = self.clock;
        self.vel = motion.kick(self.vel, rng);
        self.scale = motion.draw_scale(rng);
        if motion.redraw_interval {
            self.move_interval = rng.random::<f64>();
        }
        log::trace!("ball {} random move: vel {}, scale {}", self.id, self.vel, self.scale);
        true
    }

    /// Bounce off `opponent` if overlapping; returns whether it hit
    pub fn process_collision<B: Body + ?Sized>(&mut self, opponent: &B, motion: &Motion) -> bool {
        let hit = circles_overlap(
            self.pos,
            self.half_extent().x,
            opponent.pos(),
            opponent.half_extent().x,
        );
        if !hit {
            return false;
        }

        self.vel = motion.limit(bounce_velocity(self.vel, opponent.vel()));
        // Extra step to push out of the opponent before integration
        self.pos += self.vel;
        if let Some(count) = self.collision_count.as_mut() {
            *count += 1;
        }
        log::trace!("ball {} hit collider, vel now {}", self.id, self.vel);
        true
    }

    /// Stop dead (freeze command)
    pub fn freeze(&mut self) {
        self.vel = DVec2::ZERO;
    }
}

impl Body for RandomBall {
    fn pos(&self) -> DVec2 {
        self.pos
    }

    fn vel(&self) -> DVec2 {
        self.vel
    }

    fn half_extent(&self) -> DVec2 {
        self.base_size * self.scale / 2.0
    }
}

/// The pointer-controlled ball
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderBall {
    pub pos: DVec2,
    /// Last pointer delta; cleared by the tick after it is applied
    pub vel: DVec2,
    pub size: DVec2,
}

impl ColliderBall {
    pub fn new(pos: DVec2, size: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            size,
        }
    }

    /// Overwrite velocity with the latest pointer motion (no accumulation)
    pub fn set_pointer_delta(&mut self, delta: DVec2) {
        self.vel = delta;
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn stop(&mut self) {
        self.vel = DVec2::ZERO;
    }

    /// On-screen position readout
    pub fn readout(&self) -> String {
        format!("x: {}, y: {}", self.pos.x, self.pos.y)
    }
}

impl Body for ColliderBall {
    fn pos(&self) -> DVec2 {
        self.pos
    }

    fn vel(&self) -> DVec2 {
        self.vel
    }

    fn half_extent(&self) -> DVec2 {
        self.size / 2.0
    }
}

/// Whether the simulation still accepts ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    Running,
    /// Exit requested; ticks are ignored
    Exited,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was built from
    pub seed: u64,
    pub bounds: Bounds,
    pub phase: SimPhase,
    /// Ticks executed so far
    pub time_ticks: u64,
    /// Sum of tick `dt`s (seconds)
    pub elapsed: f64,
    pub collider: ColliderBall,
    /// Free-roaming balls in spawn order (stable iteration)
    pub balls: Vec<RandomBall>,
    pub motion: Motion,
    pub(crate) rng: Pcg32,
}

impl SimState {
    /// Build a session and spawn the ball population from `config`
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let mut state = Self::empty(config)?;

        let center = state.bounds.center().floor();
        let spread_x = Normal::new(center.x, config.spawn_spread)
            .map_err(|e| ConfigError::Invalid(format!("spawn_spread: {e}")))?;
        let spread_y = Normal::new(center.y, config.spawn_spread)
            .map_err(|e| ConfigError::Invalid(format!("spawn_spread: {e}")))?;

        let rng = &mut state.rng;
        let mut balls = Vec::with_capacity(config.ball_count);
        for i in 0..config.ball_count {
            let pos = DVec2::new(spread_x.sample(rng), spread_y.sample(rng));
            let vel = DVec2::new(
                random_sign(rng) * config.initial_speed,
                random_sign(rng) * config.initial_speed,
            );
            let ball = RandomBall::new(i as u32, pos, vel, config.ball_size, rng.random::<f64>());
            balls.push(if config.track_collisions {
                ball.with_collision_count()
            } else {
                ball
            });
        }
        state.balls = balls;

        log::info!(
            "Spawned {} balls in {}x{} (seed {})",
            state.balls.len(),
            state.bounds.width,
            state.bounds.height,
            state.seed
        );
        Ok(state)
    }

    /// Build a session around hand-placed balls
    pub fn with_balls(config: &SimConfig, balls: Vec<RandomBall>) -> Result<Self, ConfigError> {
        let mut state = Self::empty(config)?;
        state.balls = balls;
        Ok(state)
    }

    fn empty(config: &SimConfig) -> Result<Self, ConfigError> {
        let motion = Motion::from_config(config)?;
        let seed = config.seed.unwrap_or_else(clock_seed);
        Ok(Self {
            seed,
            bounds: config.bounds,
            phase: SimPhase::Running,
            time_ticks: 0,
            elapsed: 0.0,
            collider: ColliderBall::new(config.collider_start, config.collider_size),
            balls: Vec::new(),
            motion,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Zero every free-roaming ball's velocity
    pub fn freeze(&mut self) {
        for ball in &mut self.balls {
            ball.freeze();
        }
        log::debug!("Froze {} balls", self.balls.len());
    }

    /// Replace world bounds; ignored unless both sides are positive
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds.width > 0.0 && bounds.height > 0.0 {
            log::info!("World resized to {}x{}", bounds.width, bounds.height);
            self.bounds = bounds;
        } else {
            log::warn!("Ignoring resize to {}x{}", bounds.width, bounds.height);
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    /// Sum of all per-ball collider hits, if counting is enabled
    pub fn total_collisions(&self) -> Option<u64> {
        self.balls
            .iter()
            .map(|b| b.collision_count)
            .try_fold(0u64, |acc, c| c.map(|c| acc + c))
    }
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
