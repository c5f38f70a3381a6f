//! Fixed timestep simulation tick
//!
//! Advances the collider, then every free-roaming ball against it, then
//! clears the collider's velocity so it only moves while the pointer does.

use glam::DVec2;

use super::state::{Bounds, SimPhase, SimState};

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Most recent pointer motion `(dx, dy)`
    pub pointer_delta: Option<DVec2>,
    /// Zero every free-roaming ball's velocity (space)
    pub freeze: bool,
    /// Stop the simulation (escape)
    pub exit: bool,
    /// New window size
    pub resize: Option<Bounds>,
}

impl TickInput {
    /// Fold newer input on top of this one
    ///
    /// Pointer motion and resizes are overwritten, not summed; freeze and
    /// exit stay set once requested.
    pub fn merge(&mut self, newer: TickInput) {
        if newer.pointer_delta.is_some() {
            self.pointer_delta = newer.pointer_delta;
        }
        if newer.resize.is_some() {
            self.resize = newer.resize;
        }
        self.freeze |= newer.freeze;
        self.exit |= newer.exit;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Advance the simulation by one step of `dt` seconds
///
/// `dt` is whatever the host measured; negative values are treated as 0 so
/// ball clocks never run backwards.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f64) {
    if input.exit && state.phase == SimPhase::Running {
        log::info!("Exit requested after {} ticks", state.time_ticks);
        state.phase = SimPhase::Exited;
    }
    if state.phase == SimPhase::Exited {
        return;
    }

    if let Some(bounds) = input.resize {
        state.resize(bounds);
    }
    if let Some(delta) = input.pointer_delta {
        state.collider.set_pointer_delta(delta);
    }
    if input.freeze {
        state.freeze();
    }

    let dt = dt.max(0.0);
    state.time_ticks += 1;
    state.elapsed += dt;

    state.collider.update();

    let SimState {
        balls,
        collider,
        motion,
        rng,
        bounds,
        ..
    } = &mut *state;
    for ball in balls.iter_mut() {
        ball.update(dt, &*collider, bounds, motion, rng);
    }

    state.collider.stop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::SimConfig;
    use crate::sim::state::RandomBall;
    use proptest::prelude::*;

    fn config() -> SimConfig {
        SimConfig {
            seed: Some(12345),
            ..Default::default()
        }
    }

    fn calm_ball(id: u32, pos: DVec2, vel: DVec2) -> RandomBall {
        RandomBall::new(id, pos, vel, DVec2::splat(20.0), f64::INFINITY).with_collision_count()
    }

    fn pointer(dx: f64, dy: f64) -> TickInput {
        TickInput {
            pointer_delta: Some(DVec2::new(dx, dy)),
            ..Default::default()
        }
    }

    #[test]
    fn test_collider_moves_then_resets() {
        let mut state = SimState::with_balls(&config(), Vec::new()).unwrap();

        tick(&mut state, &pointer(5.0, -3.0), SIM_DT);
        assert_eq!(state.collider.pos, DVec2::new(105.0, 97.0));
        assert_eq!(state.collider.vel, DVec2::ZERO);

        // No new motion: collider stays put
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.collider.pos, DVec2::new(105.0, 97.0));
        assert_eq!(state.collider.vel, DVec2::ZERO);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_balls_see_collider_motion_this_tick() {
        // Collider moves onto the ball during this tick
        let ball = calm_ball(0, DVec2::new(130.0, 100.0), DVec2::ZERO);
        let mut state = SimState::with_balls(&config(), vec![ball]).unwrap();

        tick(&mut state, &pointer(10.0, 0.0), SIM_DT);

        let ball = &state.balls[0];
        assert_eq!(ball.collision_count, Some(1));
        // Inherited the collider's velocity, applied twice
        assert_eq!(ball.vel, DVec2::new(10.0, 0.0));
        assert_eq!(ball.pos, DVec2::new(150.0, 100.0));
    }

    #[test]
    fn test_freeze_stops_balls() {
        let balls = vec![
            calm_ball(0, DVec2::new(300.0, 300.0), DVec2::new(0.5, -0.5)),
            calm_ball(1, DVec2::new(500.0, 200.0), DVec2::new(-0.5, 0.5)),
        ];
        let mut state = SimState::with_balls(&config(), balls).unwrap();
        let before: Vec<DVec2> = state.balls.iter().map(|b| b.pos).collect();

        let freeze = TickInput {
            freeze: true,
            ..Default::default()
        };
        tick(&mut state, &freeze, SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);

        for (ball, pos) in state.balls.iter().zip(before) {
            assert_eq!(ball.vel, DVec2::ZERO);
            assert_eq!(ball.pos, pos);
        }
    }

    #[test]
    fn test_exit_stops_ticking() {
        let ball = calm_ball(0, DVec2::new(300.0, 300.0), DVec2::new(1.0, 0.0));
        let mut state = SimState::with_balls(&config(), vec![ball]).unwrap();

        let exit = TickInput {
            exit: true,
            ..Default::default()
        };
        tick(&mut state, &exit, SIM_DT);
        assert_eq!(state.phase, SimPhase::Exited);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &pointer(5.0, 5.0), SIM_DT);
        assert_eq!(state.balls[0].pos, DVec2::new(300.0, 300.0));
        assert_eq!(state.collider.pos, DVec2::new(100.0, 100.0));
    }

    #[test]
    fn test_resize_moves_walls() {
        let ball = calm_ball(0, DVec2::new(795.0, 300.0), DVec2::new(0.5, 0.0));
        let mut state = SimState::with_balls(&config(), vec![ball]).unwrap();

        let resize = TickInput {
            resize: Some(Bounds::new(1024.0, 768.0)),
            ..Default::default()
        };
        tick(&mut state, &resize, SIM_DT);
        // No wall at 800 any more
        assert_eq!(state.balls[0].vel, DVec2::new(0.5, 0.0));
        assert_eq!(state.balls[0].pos, DVec2::new(795.5, 300.0));
    }

    #[test]
    fn test_merge_keeps_latest_pointer() {
        let mut input = pointer(1.0, 1.0);
        input.merge(TickInput {
            freeze: true,
            ..Default::default()
        });
        input.merge(pointer(-2.0, 3.0));
        input.merge(TickInput::default());

        assert_eq!(input.pointer_delta, Some(DVec2::new(-2.0, 3.0)));
        assert!(input.freeze);
        assert!(!input.exit);
        assert!(!input.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = SimState::new(&config()).unwrap();
        let mut state2 = SimState::new(&config()).unwrap();

        let inputs = [pointer(3.0, 1.0), TickInput::default(), pointer(-4.0, 2.0)];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.collider, state2.collider);
    }

    #[test]
    fn test_speed_clamp_limits_bounce() {
        let mut config = config();
        config.max_speed = Some(1.5);
        let ball = calm_ball(0, DVec2::new(130.0, 100.0), DVec2::new(-0.5, 0.0));
        let mut state = SimState::with_balls(&config, vec![ball]).unwrap();

        // Unclamped this would be (0.5 + 10, 0)
        tick(&mut state, &pointer(10.0, 0.0), SIM_DT);

        let ball = &state.balls[0];
        assert_eq!(ball.collision_count, Some(1));
        assert!(ball.vel.length() <= 1.5 + 1e-9, "vel {}", ball.vel);
        assert!((ball.vel.x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_speed_clamp_limits_random_kick() {
        let mut config = config();
        config.max_speed = Some(2.0);
        let ball = RandomBall::new(0, DVec2::new(400.0, 300.0), DVec2::new(30.0, -40.0), DVec2::splat(20.0), 0.0);
        let mut state = SimState::with_balls(&config, vec![ball]).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);

        let ball = &state.balls[0];
        assert_eq!(ball.last_move, SIM_DT);
        assert!(ball.vel.length() <= 2.0 + 1e-9, "vel {}", ball.vel);
    }

    #[test]
    fn test_clock_ignores_negative_dt() {
        let ball = RandomBall::new(0, DVec2::new(400.0, 300.0), DVec2::ZERO, DVec2::splat(20.0), 0.5);
        let mut state = SimState::with_balls(&config(), vec![ball]).unwrap();
        tick(&mut state, &TickInput::default(), 0.1);
        tick(&mut state, &TickInput::default(), -5.0);
        assert!((state.balls[0].clock - 0.1).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_rest_inside_bounds_is_stable(
            x in 20.0f64..780.0,
            y in 20.0f64..580.0,
        ) {
            // Keep the collider well away
            let ball = calm_ball(0, DVec2::new(x, y), DVec2::ZERO);
            let mut config = config();
            config.collider_start = DVec2::new(-500.0, -500.0);
            let mut state = SimState::with_balls(&config, vec![ball]).unwrap();

            tick(&mut state, &TickInput::default(), 0.0);
            prop_assert_eq!(state.balls[0].pos, DVec2::new(x, y));
        }

        #[test]
        fn prop_overlap_counts_every_tick(n in 1u64..40) {
            // Ball pinned at the collider's center for every tick
            let mut config = config();
            config.collider_start = DVec2::new(400.0, 300.0);
            let ball = calm_ball(0, DVec2::new(400.0, 300.0), DVec2::ZERO);
            let mut state = SimState::with_balls(&config, vec![ball]).unwrap();

            for _ in 0..n {
                state.balls[0].pos = DVec2::new(400.0, 300.0);
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            prop_assert_eq!(state.balls[0].collision_count, Some(n));
            prop_assert_eq!(state.total_collisions(), Some(n));
        }

        #[test]
        fn prop_freeze_zeroes_all(seed in any::<u64>()) {
            let config = SimConfig { seed: Some(seed), ball_count: 20, ..Default::default() };
            let mut state = SimState::new(&config).unwrap();
            for _ in 0..10 {
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            state.freeze();
            prop_assert!(state.balls.iter().all(|b| b.vel == DVec2::ZERO));
        }
    }
}
