//! Host rig shared by the integration tests: recording joint actuators and a
//! helper that runs the four leg drivers next to a test scenario.
#![allow(dead_code)]

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use embassy_futures::block_on;
use embassy_futures::join::join4;
use embassy_futures::select::{select, Either};
use embassy_futures::yield_now;
use embassy_time::{Duration, Timer};
use quad_walker::config::GaitConfig;
use quad_walker::kinematics::conversion::Degrees;
use quad_walker::kinematics::ik::{FootPosition, JointAngles, LegGeometry};
use quad_walker::robot::joint::{Joint, JointActuator};
use quad_walker::robot::leg::LegId;
use quad_walker::robot::quad::Quad;
use quad_walker::robot::state::LegLink;
use quad_walker::tasks::leg_task::LegDriver;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub leg: LegId,
    pub joint: Joint,
    pub angle: f64,
    pub blocking: bool,
    /// Run the leg was marked as executing when the command arrived.
    pub run: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MoveLog(Rc<RefCell<Vec<Move>>>);

impl MoveLog {
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn snapshot(&self) -> Vec<Move> {
        self.0.borrow().clone()
    }

    pub fn for_leg(&self, leg: LegId) -> Vec<Move> {
        self.0
            .borrow()
            .iter()
            .filter(|m| m.leg == leg)
            .copied()
            .collect()
    }
}

/// Joint that records every command. A blocking command takes one poll, or
/// `travel` when set.
pub struct MockJoint<'a> {
    leg: LegId,
    joint: Joint,
    link: &'a LegLink,
    log: MoveLog,
    travel: Option<Duration>,
}

impl JointActuator for MockJoint<'_> {
    async fn set_target_angle(&mut self, angle: Degrees, blocking: bool) {
        self.log.0.borrow_mut().push(Move {
            leg: self.leg,
            joint: self.joint,
            angle: angle.value(),
            blocking,
            run: self.link.state().active_run,
        });
        if blocking {
            match self.travel {
                Some(travel) => Timer::after(travel).await,
                None => yield_now().await,
            }
        }
    }
}

pub fn links() -> [LegLink; 4] {
    LegId::ALL.map(|_| LegLink::new(LegGeometry::DEFAULT))
}

pub fn drivers<'a>(links: &'a [LegLink; 4], log: &MoveLog) -> [LegDriver<'a, MockJoint<'a>>; 4] {
    drivers_with_travel(links, log, None)
}

/// Drivers whose joints take `travel` per blocking command.
pub fn slow_drivers<'a>(
    links: &'a [LegLink; 4],
    log: &MoveLog,
    travel: Duration,
) -> [LegDriver<'a, MockJoint<'a>>; 4] {
    drivers_with_travel(links, log, Some(travel))
}

fn drivers_with_travel<'a>(
    links: &'a [LegLink; 4],
    log: &MoveLog,
    travel: Option<Duration>,
) -> [LegDriver<'a, MockJoint<'a>>; 4] {
    LegId::ALL.map(|id| {
        let joint = |joint| MockJoint {
            leg: id,
            joint,
            link: &links[id],
            log: log.clone(),
            travel,
        };
        LegDriver::new(id, &links[id], joint(Joint::Hip), joint(Joint::Knee))
    })
}

pub fn quad<'a>(links: &'a [LegLink; 4], config: GaitConfig) -> Quad<'a> {
    Quad::new(links, config)
}

/// Run `scenario` to completion with all four leg drivers serving commands.
/// The drivers are polled before the scenario on every pass.
pub fn drive<F: Future>(drivers: &mut [LegDriver<'_, MockJoint<'_>>; 4], scenario: F) -> F::Output {
    let [a, b, c, d] = drivers;
    match block_on(select(join4(a.run(), b.run(), c.run(), d.run()), scenario)) {
        Either::First(_) => unreachable!("leg drivers never return"),
        Either::Second(output) => output,
    }
}

pub async fn settle(polls: usize) {
    for _ in 0..polls {
        yield_now().await;
    }
}

/// Pair up a leg's hip and knee commands.
pub fn angle_pairs(moves: &[Move]) -> Vec<(f64, f64)> {
    moves
        .chunks(2)
        .map(|pair| {
            assert_eq!(pair[0].joint, Joint::Hip);
            assert_eq!(pair[1].joint, Joint::Knee);
            (pair[0].angle, pair[1].angle)
        })
        .collect()
}

pub fn solve_pairs(geometry: &LegGeometry, waypoints: &[FootPosition]) -> Vec<(f64, f64)> {
    waypoints
        .iter()
        .map(|wp| {
            let angles = geometry.solve(*wp).unwrap().angles();
            (angles.hip.value(), angles.knee.value())
        })
        .collect()
}

pub fn foot_from(geometry: &LegGeometry, (hip, knee): (f64, f64)) -> FootPosition {
    geometry.forward(JointAngles {
        hip: Degrees(hip),
        knee: Degrees(knee),
    })
}
