//! Hobby PWM servo as a [`JointActuator`].
//!
//! The joint angle is mapped onto the servo's 0–180° range through a mounting
//! offset and an optional reversal, then turned into a pulse width. Hobby
//! servos give no position feedback, so a blocking command waits for the time
//! the horn needs to travel at the configured slew rate.
use embassy_time::{Duration, Timer};
use embedded_hal::pwm::SetDutyCycle;
use fugit::Hertz;
use log::{error, trace};

use crate::kinematics::conversion::Degrees;

use super::joint::{Joint, JointActuator};
use super::leg::LegId;

// --- Servo Configuration ---
const SERVO_MIN_PULSE_US: f64 = 544.0;
const SERVO_MAX_PULSE_US: f64 = 2400.0;
const SERVO_ANGLE_RANGE: f64 = 180.0;
/// Roughly 0.1 s per 60° unloaded.
pub const DEFAULT_SLEW_RATE: f64 = 600.0;

#[derive(Debug)]
pub struct Servo<PWM> {
    pwm: PWM,
    /// Last commanded servo angle, `None` before the first command.
    angle: Option<f64>,
    max_duty: u32,
    frequency: Hertz<u32>,
    leg_id: LegId,
    joint_id: Joint,
    offset: Degrees,
    reversed: bool,
    slew_rate: f64,
}

impl<PWM> Servo<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(pwm: PWM, frequency: Hertz<u32>, leg_id: LegId, joint_id: Joint) -> Self {
        let max_duty = pwm.max_duty_cycle() as u32;
        Self {
            pwm,
            angle: None,
            max_duty,
            frequency,
            leg_id,
            joint_id,
            offset: Degrees::ZERO,
            reversed: false,
            slew_rate: DEFAULT_SLEW_RATE,
        }
    }

    /// Servo angle that corresponds to a joint angle of zero, and whether the
    /// servo turns against the joint.
    pub fn with_mount(mut self, offset: Degrees, reversed: bool) -> Self {
        self.offset = offset;
        self.reversed = reversed;
        self
    }

    /// Degrees per second.
    pub fn with_slew_rate(mut self, slew_rate: f64) -> Self {
        self.slew_rate = slew_rate;
        self
    }

    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    fn servo_angle(&self, joint: Degrees) -> f64 {
        let angle = if self.reversed {
            self.offset.value() - joint.value()
        } else {
            self.offset.value() + joint.value()
        };
        angle.clamp(0.0, SERVO_ANGLE_RANGE)
    }

    fn angle_to_duty(&self, angle: f64) -> u16 {
        let pulse_width_range = SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US;
        let pulse_us =
            libm::round(SERVO_MIN_PULSE_US + (angle / SERVO_ANGLE_RANGE) * pulse_width_range)
                as u32;

        // THE WIDTH OF THE PULSE DRIVES THE ANGLE, NOT FREQ
        let period_us = 1_000_000 / self.frequency.raw();
        ((pulse_us * self.max_duty) / period_us).min(self.max_duty) as u16
    }

    fn travel_time(&self, from: Option<f64>, to: f64) -> Duration {
        let travel = from.map_or(SERVO_ANGLE_RANGE, |from| libm::fabs(to - from));
        Duration::from_micros(libm::ceil(travel / self.slew_rate * 1_000_000.0) as u64)
    }
}

impl<PWM> JointActuator for Servo<PWM>
where
    PWM: SetDutyCycle,
{
    async fn set_target_angle(&mut self, angle: Degrees, blocking: bool) {
        if !angle.is_finite() {
            error!("{} {} refusing angle {angle:?}", self.leg_id, self.joint_id);
            return;
        }
        let target = self.servo_angle(angle);

        //Avoid setting the same angle again
        if self.angle == Some(target) {
            return;
        }
        let previous = self.angle.replace(target);

        let duty = self.angle_to_duty(target);
        trace!("{} {} {target:.1}° duty {duty}", self.leg_id, self.joint_id);
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            error!(
                "{} {} Error writing angle {:?}",
                self.leg_id, self.joint_id, e
            );
        }

        if blocking {
            Timer::after(self.travel_time(previous, target)).await;
        }
    }
}
