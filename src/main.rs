//! Host simulation of the quadruped.
//!
//! Runs the leg tasks and the control loop on the `arch-std` embassy executor
//! with simulated PWM channels, a scripted operator and a scripted range
//! finder. Set `RUST_LOG=trace` to see every duty cycle written.
use core::convert::Infallible;

use embassy_executor::Spawner;
use embassy_time::Duration;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use fugit::HertzU32;
use log::{info, trace, warn};
use quad_walker::config::{ControlConfig, GaitConfig, LEG_PART_LENGTH};
use quad_walker::kinematics::conversion::Degrees;
use quad_walker::kinematics::ik::LegGeometry;
use quad_walker::robot::joint::Joint;
use quad_walker::robot::leg::LegId;
use quad_walker::robot::quad::Quad;
use quad_walker::robot::servo::Servo;
use quad_walker::robot::state::LegLink;
use quad_walker::tasks::control_task::{ControlLoop, Operator, OperatorInput, RangeFinder};
use quad_walker::tasks::leg_task::LegDriver;

macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init_with(|| $val)
    }};
}

const SERVO_FREQUENCY: HertzU32 = HertzU32::from_raw(50);

/// PWM channel that only logs what it is given.
struct SimPwm {
    leg_id: LegId,
    joint_id: Joint,
}

impl ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        // one count per µs of the 50 Hz period
        20_000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        trace!("[SIM] {} {} duty {duty}", self.leg_id, self.joint_id);
        Ok(())
    }
}

type SimServo = Servo<SimPwm>;
type SimControl = ControlLoop<'static, ScriptedOperator, SimRangeFinder>;

fn sim_servo(leg_id: LegId, joint_id: Joint) -> SimServo {
    let servo = Servo::new(SimPwm { leg_id, joint_id }, SERVO_FREQUENCY, leg_id, joint_id);
    // right side servos are mirrored
    let reversed = matches!(leg_id, LegId::FrontRight | LegId::BackRight);
    let offset = if reversed { Degrees(180.0) } else { Degrees::ZERO };
    servo.with_mount(offset, reversed)
}

/// Lowers the body a little, asks for a walk, then asks again after the path
/// in front has been blocked.
struct ScriptedOperator {
    tick: u32,
}

impl Operator for ScriptedOperator {
    async fn poll(&mut self) -> OperatorInput {
        self.tick += 1;
        match self.tick {
            1..=100 => OperatorInput {
                height_axis: -10.0,
                ..Default::default()
            },
            101 | 200 => OperatorInput {
                walk: true,
                ..Default::default()
            },
            _ => OperatorInput::default(),
        }
    }
}

/// Clear path that closes in after the first walk.
struct SimRangeFinder {
    readings: u32,
}

impl RangeFinder for SimRangeFinder {
    async fn distance(&mut self) -> f64 {
        self.readings += 1;
        if self.readings < 150 {
            40.0
        } else {
            3.0
        }
    }
}

fn env_override<T: core::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {name}={raw:?}");
            None
        }
    }
}

#[embassy_executor::task(pool_size = 4)]
async fn leg_task(mut driver: LegDriver<'static, SimServo>) {
    info!("[LEG_TASK] {} started", driver.id());
    driver.run().await;
}

#[embassy_executor::task]
async fn control_task(mut control: SimControl) {
    if let Err(e) = control.quad_mut().init_positions().await {
        warn!("[CONTROL] initial pose rejected: {e}");
        return;
    }
    control.run().await;
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let segment_length = env_override("QUAD_SEGMENT_LENGTH_IN").unwrap_or(LEG_PART_LENGTH);
    let mut gait = GaitConfig::default();
    if let Some(ms) = env_override::<u64>("QUAD_WALK_WAIT_MS") {
        gait = gait.with_walk_wait(Duration::from_millis(ms));
    }
    info!(
        "segment length {segment_length} in, walk wait {} ms",
        gait.walk_wait.as_millis()
    );

    let geometry = LegGeometry::new(segment_length);
    let links: &'static [LegLink; 4] = mk_static!([LegLink; 4], [
        LegLink::new(geometry),
        LegLink::new(geometry),
        LegLink::new(geometry),
        LegLink::new(geometry),
    ]);

    for id in LegId::ALL {
        let driver = LegDriver::new(
            id,
            &links[id],
            sim_servo(id, Joint::Hip),
            sim_servo(id, Joint::Knee),
        );
        spawner
            .spawn(leg_task(driver))
            .expect("Failed to spawn leg task");
    }

    let control = ControlLoop::new(
        Quad::new(links, gait),
        ScriptedOperator { tick: 0 },
        SimRangeFinder { readings: 0 },
        ControlConfig::default(),
    );
    spawner
        .spawn(control_task(control))
        .expect("Failed to spawn control task");
}
