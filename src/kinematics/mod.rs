//! Leg geometry and gait planning.
//!
//! - [`conversion`] holds the angle units.
//! - [`ik`] turns foot positions into hip and knee angles (and back).
//! - [`framebuffer`] synthesizes the step and slide trajectories.
//! - [`gait_engine`] implements the state machine of the walk cycle.
//!
//! Nothing here touches hardware or time.
pub mod conversion;
pub mod framebuffer;
pub mod gait_engine;
pub mod ik;
