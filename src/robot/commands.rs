//! Commands handed from a [`Leg`](super::leg::Leg) to its leg task.
use crate::kinematics::{framebuffer::Framebuffer, ik::JointAngles};

#[derive(Debug, Clone, PartialEq)]
pub enum LegCommand {
    /// Drive both joints to `angles` once.
    Hold { angles: JointAngles, blocking: bool },
    /// Walk through a trajectory. `run` identifies it in the shared leg state.
    Execute { run: u32, framebuffer: Framebuffer },
    /// Abandon the current command and wait for the next one.
    Halt,
}
