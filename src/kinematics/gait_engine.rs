//! Four-phase walking gait.
//!
//! One leg steps while the other three slide back, which carries the body
//! forward. The stepping leg rotates front left, back right, front right, back
//! left. [`GaitEngine`] only tracks which phase the cycle is in and what every
//! leg does in it; [`Quad`](crate::robot::quad::Quad) turns that into leg
//! trajectories and timing.
use core::fmt::Display;

use crate::config::GaitConfig;
use crate::kinematics::framebuffer::LegMotion;
use crate::robot::leg::LegId;

/// Order in which legs take their step.
pub const WALK_SEQUENCE: [LegId; 4] = [
    LegId::FrontLeft,
    LegId::BackRight,
    LegId::FrontRight,
    LegId::BackLeft,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GaitPhase {
    #[default]
    Idle,
    FrontLeft,
    BackRight,
    FrontRight,
    BackLeft,
}

impl GaitPhase {
    pub const fn next(self) -> Self {
        match self {
            GaitPhase::Idle => GaitPhase::FrontLeft,
            GaitPhase::FrontLeft => GaitPhase::BackRight,
            GaitPhase::BackRight => GaitPhase::FrontRight,
            GaitPhase::FrontRight => GaitPhase::BackLeft,
            GaitPhase::BackLeft => GaitPhase::Idle,
        }
    }

    /// Leg that steps during this phase.
    pub const fn stepping_leg(self) -> Option<LegId> {
        match self {
            GaitPhase::Idle => None,
            GaitPhase::FrontLeft => Some(LegId::FrontLeft),
            GaitPhase::BackRight => Some(LegId::BackRight),
            GaitPhase::FrontRight => Some(LegId::FrontRight),
            GaitPhase::BackLeft => Some(LegId::BackLeft),
        }
    }
}

impl Display for GaitPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.stepping_leg() {
            Some(leg) => write!(f, "{leg} step"),
            None => f.write_str("idle"),
        }
    }
}

#[derive(Debug, Default)]
pub struct GaitEngine {
    phase: GaitPhase,
    completed_cycles: u32,
}

impl GaitEngine {
    pub const fn new() -> Self {
        Self {
            phase: GaitPhase::Idle,
            completed_cycles: 0,
        }
    }

    pub fn phase(&self) -> GaitPhase {
        self.phase
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Move to the next phase. Returns the new phase.
    pub fn advance(&mut self) -> GaitPhase {
        self.phase = self.phase.next();
        if self.phase == GaitPhase::Idle {
            self.completed_cycles = self.completed_cycles.wrapping_add(1);
        }
        self.phase
    }

    /// Drop back to idle without counting a completed cycle.
    pub fn abort(&mut self) {
        self.phase = GaitPhase::Idle;
    }

    /// What each leg does in `phase`, indexed by [`LegId`]. `None` when idle.
    pub fn plan(phase: GaitPhase, config: &GaitConfig) -> Option<[LegMotion; 4]> {
        let stepping = phase.stepping_leg()?;
        Some(LegId::ALL.map(|leg| {
            if leg == stepping {
                LegMotion::Step {
                    forward: config.step_forward,
                    lift: config.step_lift,
                }
            } else {
                LegMotion::Slide {
                    distance: config.slide,
                }
            }
        }))
    }
}
