//! Asynchronous tasks for the quadruped.
//!
//! - [`leg_task`]: one executor per leg, carrying out hold and trajectory
//!   commands with cancel-and-replace semantics.
//! - [`control_task`]: the operator control loop driving the [`Quad`].
//!
//! Both are plain async code generic over their hardware; the binary wraps them
//! in concrete `embassy_executor` tasks.
//!
//! [`Quad`]: crate::robot::quad::Quad
pub mod control_task;
pub mod leg_task;
