use crate::robot::leg::LegId;
use thiserror::Error;

/// Everything that can stop a foot target from turning into joint angles.
///
/// None of these are retried. They are raised before any actuator sees the
/// offending value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LegError {
    #[error("foot is {reach:.4} in from the hip, the leg only reaches {limit:.4} in")]
    Unreachable { reach: f64, limit: f64 },

    #[error("foot must be below the hip, got y = {y}")]
    FootNotBelowHip { y: f64 },

    #[error("non-finite foot coordinate or motion parameter")]
    NonFinite,

    #[error("a step needs a non-zero forward distance")]
    ZeroStep,

    #[error("{0} leg has no foot position yet")]
    Unpositioned(LegId),

    #[error("{0} leg has an empty framebuffer")]
    EmptyFramebuffer(LegId),
}
