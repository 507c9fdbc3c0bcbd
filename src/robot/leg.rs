use core::fmt::Display;
use core::ops::{Index, IndexMut};

use log::{debug, trace};

use crate::error::LegError;
use crate::kinematics::framebuffer::{Framebuffer, LegMotion};
use crate::kinematics::ik::{FootPosition, JointAngles, LegGeometry};

use super::commands::LegCommand;
use super::state::LegLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegId {
    FrontLeft = 0,
    FrontRight = 1,
    BackLeft = 2,
    BackRight = 3,
}

impl LegId {
    pub const ALL: [LegId; 4] = [
        LegId::FrontLeft,
        LegId::FrontRight,
        LegId::BackLeft,
        LegId::BackRight,
    ];
}

impl Display for LegId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LegId::FrontLeft => f.write_str("Front left"),
            LegId::FrontRight => f.write_str("Front right"),
            LegId::BackLeft => f.write_str("Back left"),
            LegId::BackRight => f.write_str("Back right"),
        }
    }
}

impl<T> Index<LegId> for [T; 4] {
    type Output = T;

    fn index(&self, leg: LegId) -> &Self::Output {
        &self[leg as usize]
    }
}

impl<T> IndexMut<LegId> for [T; 4] {
    fn index_mut(&mut self, leg: LegId) -> &mut Self::Output {
        &mut self[leg as usize]
    }
}

/// Command side of one leg.
///
/// Solves IK and plans trajectories synchronously; actuation happens on the
/// leg's own task ([`LegDriver`](crate::tasks::leg_task::LegDriver)), which
/// shares the [`LegLink`] with this handle.
pub struct Leg<'a> {
    id: LegId,
    link: &'a LegLink,
    framebuffer: Framebuffer,
    next_run: u32,
}

impl<'a> Leg<'a> {
    pub fn new(id: LegId, link: &'a LegLink) -> Self {
        Self {
            id,
            link,
            framebuffer: Framebuffer::new(),
            next_run: 0,
        }
    }

    pub fn id(&self) -> LegId {
        self.id
    }

    pub fn geometry(&self) -> &LegGeometry {
        self.link.geometry()
    }

    pub fn foot_position(&self) -> Option<FootPosition> {
        self.link.state().pose.map(|pose| pose.foot())
    }

    pub fn joint_angles(&self) -> Option<JointAngles> {
        self.link.state().pose.map(|pose| pose.angles())
    }

    /// Solve and store the joint angles for `foot`. Nothing moves until
    /// [`update_leg`](Self::update_leg) or a trajectory run.
    pub fn set_foot_position(&mut self, foot: FootPosition) -> Result<JointAngles, LegError> {
        let angles = self.link.set_foot_position(foot)?;
        trace!(
            "[LEG] {} foot ({:.3}, {:.3}) -> hip {} knee {}",
            self.id,
            foot.x,
            foot.y,
            angles.hip,
            angles.knee
        );
        Ok(angles)
    }

    /// Send the stored angles to both joints. With `block` the caller waits
    /// until the joints report they are there.
    ///
    /// Goes through the same command slot as trajectories, so an in-flight run
    /// is cancelled.
    pub async fn update_leg(&mut self, block: bool) -> Result<(), LegError> {
        let angles = self.joint_angles().ok_or(LegError::Unpositioned(self.id))?;
        self.link.set_active_run(None);

        if block {
            self.link.settled.reset();
            self.link.command.signal(LegCommand::Hold {
                angles,
                blocking: true,
            });
            self.link.settled.wait().await;
        } else {
            self.link.command.signal(LegCommand::Hold {
                angles,
                blocking: false,
            });
        }
        Ok(())
    }

    pub fn write_framebuffer_step(&mut self, forward: f64, lift: f64) -> Result<(), LegError> {
        self.write_framebuffer(LegMotion::Step { forward, lift })
    }

    pub fn write_framebuffer_slide(&mut self, slide: f64) -> Result<(), LegError> {
        self.write_framebuffer(LegMotion::Slide { distance: slide })
    }

    /// Replace the framebuffer with `motion` starting from the current foot
    /// position. The old buffer survives if the new one is rejected.
    pub fn write_framebuffer(&mut self, motion: LegMotion) -> Result<(), LegError> {
        let from = self.foot_position().ok_or(LegError::Unpositioned(self.id))?;
        let framebuffer = Framebuffer::plan(from, motion)?;
        framebuffer.validate(self.link.geometry())?;
        self.framebuffer = framebuffer;
        Ok(())
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Hand the framebuffer to the leg task and return at once. Any run still
    /// in progress is cancelled. Returns the id of the new run.
    pub fn execute_framebuffer(&mut self) -> Result<u32, LegError> {
        if self.framebuffer.is_empty() {
            return Err(LegError::EmptyFramebuffer(self.id));
        }

        let run = self.next_run;
        self.next_run = self.next_run.wrapping_add(1);

        if let Some(previous) = self.active_run() {
            debug!("[LEG] {} run {previous} replaced by run {run}", self.id);
        }
        self.link.set_active_run(Some(run));
        self.link.command.signal(LegCommand::Execute {
            run,
            framebuffer: self.framebuffer.clone(),
        });
        Ok(run)
    }

    pub fn active_run(&self) -> Option<u32> {
        self.link.state().active_run
    }

    pub fn is_executing(&self) -> bool {
        self.active_run().is_some()
    }

    /// Stop whatever the leg task is running. The joints stay where the last
    /// command put them.
    pub fn halt(&mut self) {
        if let Some(run) = self.active_run() {
            debug!("[LEG] {} halting run {run}", self.id);
        }
        self.link.set_active_run(None);
        self.link.command.signal(LegCommand::Halt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_by_leg() {
        let mut names = ["fl", "fr", "bl", "br"];
        assert_eq!(names[LegId::BackLeft], "bl");
        names[LegId::FrontRight] = "x";
        assert_eq!(names[1], "x");
    }

    #[test]
    fn unpositioned_leg_refuses_to_plan() {
        let link = LegLink::new(LegGeometry::DEFAULT);
        let mut leg = Leg::new(LegId::BackRight, &link);
        assert_eq!(
            leg.write_framebuffer_slide(-0.5),
            Err(LegError::Unpositioned(LegId::BackRight))
        );
        assert_eq!(
            leg.execute_framebuffer(),
            Err(LegError::EmptyFramebuffer(LegId::BackRight))
        );
    }

    #[test]
    fn set_foot_position_stores_pose() {
        let link = LegLink::new(LegGeometry::DEFAULT);
        let mut leg = Leg::new(LegId::FrontLeft, &link);
        let angles = leg.set_foot_position(FootPosition::new(0.0, -10.0)).unwrap();
        assert_eq!(leg.foot_position(), Some(FootPosition::new(0.0, -10.0)));
        assert_eq!(leg.joint_angles(), Some(angles));
    }

    #[test]
    fn rejected_target_keeps_previous_pose() {
        let link = LegLink::new(LegGeometry::DEFAULT);
        let mut leg = Leg::new(LegId::FrontLeft, &link);
        leg.set_foot_position(FootPosition::new(0.5, -9.0)).unwrap();
        assert!(leg.set_foot_position(FootPosition::new(0.0, -20.0)).is_err());
        assert_eq!(leg.foot_position(), Some(FootPosition::new(0.5, -9.0)));
    }

    #[test]
    fn rejected_framebuffer_keeps_previous_one() {
        let link = LegLink::new(LegGeometry::DEFAULT);
        let mut leg = Leg::new(LegId::FrontLeft, &link);
        leg.set_foot_position(FootPosition::new(0.0, -12.0)).unwrap();
        leg.write_framebuffer_slide(0.5).unwrap();
        let before = leg.framebuffer().clone();

        assert_eq!(leg.write_framebuffer_step(0.0, 1.0), Err(LegError::ZeroStep));
        assert!(matches!(
            leg.write_framebuffer_slide(6.0),
            Err(LegError::Unreachable { .. })
        ));
        assert_eq!(leg.framebuffer(), &before);
    }

    #[test]
    fn execute_marks_run_active_and_replaces_it() {
        let link = LegLink::new(LegGeometry::DEFAULT);
        let mut leg = Leg::new(LegId::FrontLeft, &link);
        leg.set_foot_position(FootPosition::new(0.0, -10.0)).unwrap();
        leg.write_framebuffer_slide(-0.5).unwrap();

        let first = leg.execute_framebuffer().unwrap();
        assert_eq!(leg.active_run(), Some(first));
        let second = leg.execute_framebuffer().unwrap();
        assert_ne!(first, second);
        assert_eq!(leg.active_run(), Some(second));

        leg.halt();
        assert!(!leg.is_executing());
    }
}
