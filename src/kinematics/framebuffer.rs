//! Leg trajectories ("framebuffers").
//!
//! A framebuffer is [`FRAMEBUFFER_SIZE`] foot waypoints approximating one short
//! motion, starting at the foot's current position. The leg task walks through
//! them one blocking actuation at a time.
use core::ops::Deref;

use heapless::Vec;

use crate::config::FRAMEBUFFER_SIZE;
use crate::error::LegError;

use super::ik::{FootPosition, LegGeometry};

/// The two motions a foot makes during a walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegMotion {
    /// Lift, arc forward by `forward` and land. `lift` is the arc height.
    Step { forward: f64, lift: f64 },
    /// Stay on the ground and move by `distance` along x.
    Slide { distance: f64 },
}

impl LegMotion {
    pub fn is_step(&self) -> bool {
        matches!(self, LegMotion::Step { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Framebuffer {
    waypoints: Vec<FootPosition, FRAMEBUFFER_SIZE>,
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    pub fn plan(from: FootPosition, motion: LegMotion) -> Result<Self, LegError> {
        match motion {
            LegMotion::Step { forward, lift } => Self::step(from, forward, lift),
            LegMotion::Slide { distance } => Self::slide(from, distance),
        }
    }

    /// Parabolic arc from `from` to `forward` ahead, peaking `lift` above the
    /// start halfway through.
    pub fn step(from: FootPosition, forward: f64, lift: f64) -> Result<Self, LegError> {
        if !forward.is_finite() || !lift.is_finite() {
            return Err(LegError::NonFinite);
        }
        if forward == 0.0 {
            return Err(LegError::ZeroStep);
        }

        // vertex (h, k), the curve passes through `from`
        let h = from.x + forward / 2.0;
        let k = from.y + lift;
        let a = (from.y - k) / square(from.x - h);

        Ok(Self::sample(from.x, forward, |x| a * square(x - h) + k))
    }

    pub fn slide(from: FootPosition, distance: f64) -> Result<Self, LegError> {
        if !distance.is_finite() {
            return Err(LegError::NonFinite);
        }
        Ok(Self::sample(from.x, distance, |_| from.y))
    }

    /// Evenly spaced x samples over `[start, start + span]`.
    fn sample(start: f64, span: f64, y_at: impl Fn(f64) -> f64) -> Self {
        let last = (FRAMEBUFFER_SIZE - 1) as f64;
        let waypoints = (0..FRAMEBUFFER_SIZE)
            .map(|i| {
                let x = start + span * (i as f64 / last);
                FootPosition::new(x, y_at(x))
            })
            .collect();
        Self { waypoints }
    }

    /// Check every waypoint against the leg's workspace before anything moves.
    pub fn validate(&self, geometry: &LegGeometry) -> Result<(), LegError> {
        self.waypoints
            .iter()
            .try_for_each(|waypoint| geometry.solve(*waypoint).map(|_| ()))
    }

}

impl Deref for Framebuffer {
    type Target = [FootPosition];

    fn deref(&self) -> &Self::Target {
        &self.waypoints
    }
}

fn square(x: f64) -> f64 {
    x * x
}
