//! Fixed-rate tick driver
//!
//! Turns host frame deltas into fixed simulation steps and feeds each step
//! the input queued since the last one.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::input::{InputQueue, InputSender};

use super::snapshot::Snapshot;
use super::state::SimState;
use super::tick::{TickInput, tick};

/// Owns the simulation and steps it at a fixed rate
#[derive(Debug)]
pub struct Driver {
    pub state: SimState,
    step_dt: f64,
    accumulator: f64,
    queue: InputQueue,
    /// Input drained but not yet consumed by a step
    pending: TickInput,
}

impl Driver {
    /// `step_dt` must be finite and > 0; anything else falls back to [`SIM_DT`]
    pub fn new(state: SimState, step_dt: f64) -> Self {
        let step_dt = if step_dt.is_finite() && step_dt > 0.0 {
            step_dt
        } else {
            log::warn!("Bad fixed step {step_dt}, using {SIM_DT}");
            SIM_DT
        };
        Self {
            state,
            step_dt,
            accumulator: 0.0,
            queue: InputQueue::new(),
            pending: TickInput::default(),
        }
    }

    /// Handle for the windowing layer to push events through
    pub fn sender(&self) -> InputSender {
        self.queue.sender()
    }

    pub fn step_dt(&self) -> f64 {
        self.step_dt
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Run as many fixed steps as `frame_dt` covers; returns how many ran
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        self.pending.merge(self.queue.drain());
        if self.pending.exit {
            // Exit takes effect immediately, without spending a step
            tick(&mut self.state, &std::mem::take(&mut self.pending), 0.0);
        }
        if !self.is_running() {
            return 0;
        }

        // NaN would poison the accumulator for good
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        } else {
            log::warn!("Dropping non-finite frame delta {frame_dt}");
        }

        let mut substeps = 0;
        while self.accumulator >= self.step_dt && substeps < MAX_SUBSTEPS {
            // One-shot input only applies to the first step
            let input = std::mem::take(&mut self.pending);
            tick(&mut self.state, &input, self.step_dt);
            self.accumulator -= self.step_dt;
            substeps += 1;
        }
        substeps
    }

    /// Single tick with a host-measured `dt`, for hosts with their own timer
    pub fn step(&mut self, dt: f64) {
        self.pending.merge(self.queue.drain());
        let input = std::mem::take(&mut self.pending);
        tick(&mut self.state, &input, dt);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }
}
