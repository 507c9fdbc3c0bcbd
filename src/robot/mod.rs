//! Core robot types.
//!
//! - [`leg`]: leg roles and the per-leg command handle.
//! - [`quad`]: the four-legged body, body offset and walk cycle.
//! - [`joint`]: joint enumeration and the [`JointActuator`](joint::JointActuator) interface.
//! - [`servo`]: PWM hobby servo implementing that interface.
//! - [`state`]: state shared between a leg handle and its leg task.
//! - [`commands`]: commands sent to the leg tasks.
pub mod commands;
pub mod joint;
pub mod leg;
pub mod quad;
pub mod servo;
pub mod state;
