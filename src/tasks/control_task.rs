//! Operator control loop.
//!
//! Every tick reads the front range finder and the operator's controls, nudges
//! the body offset, pushes it to the legs and sleeps for the control period. A
//! walk request runs a full walk cycle when nothing is in front of the robot,
//! followed by a cooldown. The loop does not poll input while walking.
use embassy_time::Timer;
use log::{debug, error, info, warn};

use crate::config::ControlConfig;
use crate::robot::quad::Quad;

/// Raw controller state for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatorInput {
    /// Stick axis raising (positive) or lowering the body.
    pub height_axis: f64,
    /// Stick axis shifting the body backwards (positive) or forwards.
    pub shift_axis: f64,
    pub walk: bool,
}

#[allow(async_fn_in_trait)]
pub trait Operator {
    async fn poll(&mut self) -> OperatorInput;
}

#[allow(async_fn_in_trait)]
pub trait RangeFinder {
    /// Distance to the nearest obstacle ahead, in inches.
    async fn distance(&mut self) -> f64;
}

/// What a single control tick ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    /// The new body offset was out of reach and has been rolled back.
    BodyRejected,
    Walked,
    /// Walk requested but an obstacle is too close.
    Blocked,
    WalkFailed,
}

pub struct ControlLoop<'a, O, R> {
    quad: Quad<'a>,
    operator: O,
    ranger: R,
    config: ControlConfig,
}

impl<'a, O, R> ControlLoop<'a, O, R>
where
    O: Operator,
    R: RangeFinder,
{
    pub fn new(quad: Quad<'a>, operator: O, ranger: R, config: ControlConfig) -> Self {
        Self {
            quad,
            operator,
            ranger,
            config,
        }
    }

    pub fn quad(&self) -> &Quad<'a> {
        &self.quad
    }

    pub fn quad_mut(&mut self) -> &mut Quad<'a> {
        &mut self.quad
    }

    pub async fn run(&mut self) {
        info!("[CONTROL] loop started");
        loop {
            let tick = self.tick().await;
            if tick != Tick::Idle {
                debug!("[CONTROL] tick: {tick:?}");
            }
        }
    }

    pub async fn tick(&mut self) -> Tick {
        let front_clear = self.ranger.distance().await >= self.config.front_min_distance;
        let input = self.operator.poll().await;

        let mut outcome = Tick::Idle;
        let (body_x, body_y) = self.quad.body();
        self.quad
            .change_body_y(input.height_axis * self.config.sensitivity);
        self.quad
            .change_body_x(-input.shift_axis * self.config.sensitivity);
        if let Err(e) = self.quad.update_body().await {
            warn!("[CONTROL] body offset {:?} rejected: {e}", self.quad.body());
            self.quad.set_body_x(body_x);
            self.quad.set_body_y(body_y);
            outcome = Tick::BodyRejected;
        }
        Timer::after(self.config.period).await;

        if input.walk {
            if !front_clear {
                info!("[CONTROL] obstacle ahead, not walking");
                return Tick::Blocked;
            }
            if let Err(e) = self.quad.walk_cycle().await {
                error!("[CONTROL] walk failed: {e}");
                return Tick::WalkFailed;
            }
            Timer::after(self.config.walk_cooldown).await;
            return Tick::Walked;
        }
        outcome
    }
}
