//! Two-segment leg inverse kinematics.
//!
//! Angles are 0 when the leg is completely straight. Positive when bent toward
//! the front of the robot, negative toward the back.
//!
//! Distances are in inches. x: front of the robot is positive. y: up is
//! positive, so a standing foot has a negative y.
use crate::config::LEG_PART_LENGTH;
use crate::error::LegError;

use super::conversion::{degrees_to_radians, radians_to_degrees, Degrees, Radians};

/// Foot position in the leg's local frame, hip joint at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FootPosition {
    pub x: f64,
    pub y: f64,
}

impl FootPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line hip to foot distance.
    pub fn reach(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointAngles {
    pub hip: Degrees,
    pub knee: Degrees,
}

/// A foot position together with the joint angles solved from it. Only
/// [`LegGeometry::solve`] builds one, so the two never drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegPose {
    foot: FootPosition,
    angles: JointAngles,
}

impl LegPose {
    pub fn foot(&self) -> FootPosition {
        self.foot
    }

    pub fn angles(&self) -> JointAngles {
        self.angles
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegGeometry {
    segment_length: f64,
}

impl LegGeometry {
    pub const DEFAULT: Self = Self::new(LEG_PART_LENGTH);

    pub const fn new(segment_length: f64) -> Self {
        Self { segment_length }
    }

    /// Furthest the foot can be from the hip: both segments in a line.
    pub fn max_reach(&self) -> f64 {
        2.0 * self.segment_length
    }

    /// Solve the hip and knee angles that put the foot at `foot`.
    ///
    /// Rejects feet at or above the hip (the bend angle is undefined at
    /// `y = 0`) and feet further than [`max_reach`](Self::max_reach). Nothing is
    /// clamped.
    pub fn solve(&self, foot: FootPosition) -> Result<LegPose, LegError> {
        if !foot.x.is_finite() || !foot.y.is_finite() {
            return Err(LegError::NonFinite);
        }
        if foot.y >= 0.0 {
            return Err(LegError::FootNotBelowHip { y: foot.y });
        }

        let length = foot.reach();
        let limit = self.max_reach();
        if length > limit {
            return Err(LegError::Unreachable {
                reach: length,
                limit,
            });
        }

        let bend = radians_to_degrees(Radians(libm::atan(foot.x / -foot.y)));
        let angles = self.set_overall_leg(length, bend);
        Ok(LegPose { foot, angles })
    }

    fn set_overall_leg(&self, length: f64, bend: Degrees) -> JointAngles {
        // interior angle at the knee, 180 when straight
        let knee = radians_to_degrees(Radians(
            2.0 * libm::asin(length / (2.0 * self.segment_length)),
        ))
        .value();
        let hip = 90.0 - knee / 2.0 + bend.value();

        JointAngles {
            hip: Degrees(hip),
            // 0 when straight, knee bends backwards
            knee: Degrees(180.0 - knee),
        }
    }

    /// Foot position reached with the given joint angles.
    pub fn forward(&self, angles: JointAngles) -> FootPosition {
        let interior = 180.0 - angles.knee.value();
        let length = 2.0
            * self.segment_length
            * libm::sin(degrees_to_radians(Degrees(interior / 2.0)).value());
        let bend = degrees_to_radians(Degrees(angles.hip.value() - 90.0 + interior / 2.0)).value();

        FootPosition::new(length * libm::sin(bend), -length * libm::cos(bend))
    }
}

impl Default for LegGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}
