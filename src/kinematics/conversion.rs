//! Angle units.
//!
//! Joint angles cross module boundaries as [`Degrees`]; the trigonometry in
//! [`ik`](super::ik) works in [`Radians`]. Converting between them goes through
//! the two functions below and nowhere else.
use core::f64::consts::PI;
use core::fmt::Display;

const RAD_TO_DEG: f64 = 180.0 / PI;
const DEG_TO_RAD: f64 = PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Degrees(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Radians(pub f64);

pub fn radians_to_degrees(angle: Radians) -> Degrees {
    Degrees(angle.0 * RAD_TO_DEG)
}

pub fn degrees_to_radians(angle: Degrees) -> Radians {
    Radians(angle.0 * DEG_TO_RAD)
}

impl Degrees {
    pub const ZERO: Self = Degrees(0.0);

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Radians {
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Display for Degrees {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}
