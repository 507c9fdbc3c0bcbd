use embassy_time::Timer;
use log::{debug, info, warn};

use crate::config::{GaitConfig, INITIAL_BODY_X, INITIAL_BODY_Y};
use crate::error::LegError;
use crate::kinematics::gait_engine::{GaitEngine, GaitPhase};
use crate::kinematics::ik::FootPosition;

use super::leg::{Leg, LegId};
use super::state::LegLink;

/// The whole robot: four legs in fixed roles and one body offset.
///
/// Moving the body by (x, y) is the same as moving every foot by (-x, -y) in
/// its leg frame, so the body offset is applied to all feet at once.
pub struct Quad<'a> {
    legs: [Leg<'a>; 4],
    body_x: f64,
    body_y: f64,
    gait: GaitEngine,
    config: GaitConfig,
}

impl<'a> Quad<'a> {
    /// `links` is indexed by [`LegId`]: front left, front right, back left,
    /// back right.
    pub fn new(links: &'a [LegLink; 4], config: GaitConfig) -> Self {
        Self {
            legs: LegId::ALL.map(|id| Leg::new(id, &links[id])),
            body_x: INITIAL_BODY_X,
            body_y: INITIAL_BODY_Y,
            gait: GaitEngine::new(),
            config,
        }
    }

    /// Put every foot under the initial body offset.
    pub async fn init_positions(&mut self) -> Result<(), LegError> {
        self.update_body().await?;
        info!(
            "[QUAD] initialized, body at ({}, {})",
            self.body_x, self.body_y
        );
        Ok(())
    }

    pub fn leg(&self, id: LegId) -> &Leg<'a> {
        &self.legs[id]
    }

    pub fn body(&self) -> (f64, f64) {
        (self.body_x, self.body_y)
    }

    pub fn gait_phase(&self) -> GaitPhase {
        self.gait.phase()
    }

    pub fn completed_cycles(&self) -> u32 {
        self.gait.completed_cycles()
    }

    pub fn set_body_x(&mut self, body_x: f64) {
        self.body_x = body_x;
    }

    pub fn change_body_x(&mut self, increment: f64) {
        self.body_x += increment;
    }

    pub fn set_body_y(&mut self, body_y: f64) {
        self.body_y = body_y;
    }

    pub fn change_body_y(&mut self, increment: f64) {
        self.body_y += increment;
    }

    /// Send every foot to the negated body offset, without waiting for the
    /// joints. The target is checked once up front: either all four legs take
    /// it or none do.
    pub async fn update_body(&mut self) -> Result<(), LegError> {
        let target = FootPosition::new(-self.body_x, -self.body_y);
        for leg in self.legs.iter() {
            leg.geometry().solve(target)?;
        }

        for leg in self.legs.iter_mut() {
            leg.set_foot_position(target)?;
        }
        for leg in self.legs.iter_mut() {
            leg.update_leg(false).await?;
        }
        Ok(())
    }

    /// One full walk cycle: front left, back right, front right, back left.
    ///
    /// Each phase starts all four legs together and then waits
    /// [`GaitConfig::walk_wait`]. The wait does not check that the legs are
    /// done; a leg still moving has its run replaced by the next phase.
    pub async fn walk_cycle(&mut self) -> Result<(), LegError> {
        info!("[GAIT] walk cycle {} start", self.gait.completed_cycles());
        let result = self.run_phases().await;
        if let Err(e) = &result {
            warn!("[GAIT] walk cycle aborted in phase {}: {e}", self.gait.phase());
            self.gait.abort();
        }
        result
    }

    async fn run_phases(&mut self) -> Result<(), LegError> {
        let mut phase = self.gait.advance();
        while let Some(plan) = GaitEngine::plan(phase, &self.config) {
            debug!("[GAIT] phase: {phase}");
            for leg in self.legs.iter() {
                if leg.is_executing() {
                    warn!("[GAIT] {} still moving at phase start", leg.id());
                }
            }

            for id in LegId::ALL {
                self.legs[id].write_framebuffer(plan[id])?;
            }
            for leg in self.legs.iter_mut() {
                leg.execute_framebuffer()?;
            }

            Timer::after(self.config.walk_wait).await;
            phase = self.gait.advance();
        }
        info!("[GAIT] walk cycle done");
        Ok(())
    }

    /// Cancel every leg's run.
    pub fn halt(&mut self) {
        for leg in self.legs.iter_mut() {
            leg.halt();
        }
        self.gait.abort();
    }
}
