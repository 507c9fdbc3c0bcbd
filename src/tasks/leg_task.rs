//! Per-leg trajectory execution.
//!
//! Each leg has one [`LegDriver`] owning its two joint actuators. The driver
//! waits for [`LegCommand`]s from the leg's [`Leg`](crate::robot::leg::Leg)
//! handle and carries them out. A command that arrives while another is still
//! running cancels it on the spot: the running future is dropped before the new
//! command starts, so two commands never drive the same joints.
use embassy_futures::select::{select, Either};
use log::{debug, error, trace};

use crate::kinematics::framebuffer::Framebuffer;
use crate::kinematics::ik::JointAngles;
use crate::robot::commands::LegCommand;
use crate::robot::joint::JointActuator;
use crate::robot::leg::LegId;
use crate::robot::state::LegLink;

pub struct LegDriver<'a, A> {
    id: LegId,
    link: &'a LegLink,
    hip: A,
    knee: A,
}

impl<'a, A> LegDriver<'a, A>
where
    A: JointActuator,
{
    pub fn new(id: LegId, link: &'a LegLink, hip: A, knee: A) -> Self {
        Self {
            id,
            link,
            hip,
            knee,
        }
    }

    pub fn id(&self) -> LegId {
        self.id
    }

    /// Serve commands forever.
    pub async fn run(&mut self) {
        let link = self.link;
        let mut command = link.command.wait().await;

        loop {
            // newer command first, so a replaced run never issues another move
            let outcome = select(link.command.wait(), self.perform(&command)).await;
            command = match outcome {
                Either::First(newer) => {
                    debug!("[LEG_TASK] {} cancelled by a newer command", self.id);
                    newer
                }
                Either::Second(()) => link.command.wait().await,
            };
        }
    }

    async fn perform(&mut self, command: &LegCommand) {
        match command {
            LegCommand::Hold { angles, blocking } => {
                self.actuate(*angles, *blocking).await;
                if *blocking {
                    self.link.settled.signal(());
                }
            }
            LegCommand::Execute { run, framebuffer } => {
                self.execute(*run, framebuffer).await;
            }
            LegCommand::Halt => debug!("[LEG_TASK] {} halted", self.id),
        }
    }

    async fn execute(&mut self, run: u32, framebuffer: &Framebuffer) {
        debug!(
            "[LEG_TASK] {} run {run}: {} waypoints",
            self.id,
            framebuffer.len()
        );
        for (i, waypoint) in framebuffer.iter().enumerate() {
            let angles = match self.link.set_foot_position(*waypoint) {
                Ok(angles) => angles,
                Err(e) => {
                    error!("[LEG_TASK] {} run {run} aborted at waypoint {i}: {e}", self.id);
                    break;
                }
            };
            trace!("[LEG_TASK] {} run {run} waypoint {i}", self.id);
            self.actuate(angles, true).await;
        }
        self.link.finish_run(run);
    }

    async fn actuate(&mut self, angles: JointAngles, blocking: bool) {
        self.hip.set_target_angle(angles.hip, blocking).await;
        self.knee.set_target_angle(angles.knee, blocking).await;
    }
}
