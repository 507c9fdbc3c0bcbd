//! Joint enumeration and the actuator interface the legs drive.
use core::fmt::Display;

use crate::kinematics::conversion::Degrees;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Hip = 0,
    Knee = 1,
}

impl Display for Joint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Joint::Hip => f.write_str("hip"),
            Joint::Knee => f.write_str("knee"),
        }
    }
}

/// One position-controlled joint motor.
///
/// With `blocking` set the returned future resolves once the joint has reached
/// `angle`; otherwise it resolves as soon as the command is issued. There is no
/// failure path: an implementation that can fail logs and carries on.
#[allow(async_fn_in_trait)]
pub trait JointActuator {
    async fn set_target_angle(&mut self, angle: Degrees, blocking: bool);
}
