//! Library root for the quadruped walker.
//!
//! Re-exports all main modules: [`kinematics`], [`robot`], and [`tasks`].
//! Used by the main binary and by the integration tests.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod kinematics;
pub mod robot;
pub mod tasks;

pub use error::LegError;
