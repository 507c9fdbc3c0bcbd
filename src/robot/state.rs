use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::error::LegError;
use crate::kinematics::ik::{FootPosition, JointAngles, LegGeometry, LegPose};

use super::commands::LegCommand;

/// Geometry state of one leg, shared by the [`Leg`](super::leg::Leg) handle
/// and its leg task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegState {
    /// `None` until the first successful `set_foot_position`.
    pub pose: Option<LegPose>,
    /// Trajectory run the leg task is working through, if any.
    pub active_run: Option<u32>,
}

impl LegState {
    pub const fn new() -> Self {
        Self {
            pose: None,
            active_run: None,
        }
    }
}

impl Default for LegState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a leg handle and its leg task share.
///
/// Only the latest command is kept: signalling a new one while the task is
/// still busy replaces the old one, and the task drops whatever it was doing.
pub struct LegLink {
    geometry: LegGeometry,
    pub(crate) command: Signal<CriticalSectionRawMutex, LegCommand>,
    pub(crate) settled: Signal<CriticalSectionRawMutex, ()>,
    state: Mutex<CriticalSectionRawMutex, RefCell<LegState>>,
}

impl LegLink {
    pub const fn new(geometry: LegGeometry) -> Self {
        Self {
            geometry,
            command: Signal::new(),
            settled: Signal::new(),
            state: Mutex::new(RefCell::new(LegState::new())),
        }
    }

    pub fn geometry(&self) -> &LegGeometry {
        &self.geometry
    }

    pub fn state(&self) -> LegState {
        self.state.lock(|state| *state.borrow())
    }

    /// Solve IK for `foot` and store the result. The stored pose is left alone
    /// on error.
    pub fn set_foot_position(&self, foot: FootPosition) -> Result<JointAngles, LegError> {
        let pose = self.geometry.solve(foot)?;
        self.state
            .lock(|state| state.borrow_mut().pose = Some(pose));
        Ok(pose.angles())
    }

    pub(crate) fn set_active_run(&self, run: Option<u32>) {
        self.state
            .lock(|state| state.borrow_mut().active_run = run);
    }

    /// Clear the active run, unless a newer one has taken its place.
    pub(crate) fn finish_run(&self, run: u32) -> bool {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.active_run == Some(run) {
                state.active_run = None;
                true
            } else {
                false
            }
        })
    }
}
