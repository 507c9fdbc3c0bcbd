//! Operator control loop ticks against simulated legs.
mod common;

use std::collections::VecDeque;

use approx::assert_abs_diff_eq;
use common::*;
use embassy_time::Duration;
use quad_walker::config::{ControlConfig, GaitConfig};
use quad_walker::robot::leg::LegId;
use quad_walker::tasks::control_task::{ControlLoop, Operator, OperatorInput, RangeFinder, Tick};

struct Script(VecDeque<OperatorInput>);

impl Operator for Script {
    async fn poll(&mut self) -> OperatorInput {
        self.0.pop_front().unwrap_or_default()
    }
}

struct FixedRange(f64);

impl RangeFinder for FixedRange {
    async fn distance(&mut self) -> f64 {
        self.0
    }
}

fn script(inputs: &[OperatorInput]) -> Script {
    Script(inputs.iter().copied().collect())
}

fn fast_config() -> ControlConfig {
    ControlConfig {
        period: Duration::from_millis(1),
        walk_cooldown: Duration::from_millis(1),
        ..ControlConfig::new()
    }
}

fn fast_gait() -> GaitConfig {
    GaitConfig::new().with_walk_wait(Duration::from_millis(20))
}

#[test]
fn sticks_move_the_body() {
    let links = links();
    let log = MoveLog::default();
    let mut drivers = drivers(&links, &log);
    let operator = script(&[OperatorInput {
        height_axis: 1000.0,
        shift_axis: 500.0,
        walk: false,
    }]);
    let mut control = ControlLoop::new(
        quad(&links, fast_gait()),
        operator,
        FixedRange(40.0),
        fast_config(),
    );

    drive(&mut drivers, async {
        control.quad_mut().init_positions().await.unwrap();
        assert_eq!(control.tick().await, Tick::Idle);
    });

    let (body_x, body_y) = control.quad().body();
    assert_abs_diff_eq!(body_x, -0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(body_y, 11.0, epsilon = 1e-12);
    for id in LegId::ALL {
        let foot = control.quad().leg(id).foot_position().unwrap();
        assert_abs_diff_eq!(foot.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(foot.y, -11.0, epsilon = 1e-12);
    }
}

#[test]
fn out_of_reach_input_is_rolled_back() {
    let links = links();
    let log = MoveLog::default();
    let mut drivers = drivers(&links, &log);
    let operator = script(&[OperatorInput {
        height_axis: 3000.0,
        ..Default::default()
    }]);
    let mut control = ControlLoop::new(
        quad(&links, fast_gait()),
        operator,
        FixedRange(40.0),
        fast_config(),
    );

    drive(&mut drivers, async {
        control.quad_mut().init_positions().await.unwrap();
        assert_eq!(control.tick().await, Tick::BodyRejected);
        // no input this time: same body, nothing rejected
        assert_eq!(control.tick().await, Tick::Idle);
    });

    assert_eq!(control.quad().body(), (0.0, 10.0));
    let foot = control.quad().leg(LegId::FrontLeft).foot_position().unwrap();
    assert_eq!(foot.y, -10.0);
}

#[test]
fn obstacle_ahead_blocks_walking() {
    let links = links();
    let log = MoveLog::default();
    let mut drivers = drivers(&links, &log);
    let operator = script(&[OperatorInput {
        walk: true,
        ..Default::default()
    }]);
    let mut control = ControlLoop::new(
        quad(&links, fast_gait()),
        operator,
        FixedRange(4.9),
        fast_config(),
    );

    drive(&mut drivers, async {
        control.quad_mut().init_positions().await.unwrap();
        assert_eq!(control.tick().await, Tick::Blocked);
    });

    assert_eq!(control.quad().completed_cycles(), 0);
    assert!(log.snapshot().iter().all(|m| !m.blocking));
}

#[test]
fn clear_path_walks_one_cycle() {
    let links = links();
    let log = MoveLog::default();
    let mut drivers = drivers(&links, &log);
    let operator = script(&[OperatorInput {
        walk: true,
        ..Default::default()
    }]);
    let mut control = ControlLoop::new(
        quad(&links, fast_gait()),
        operator,
        FixedRange(5.0),
        fast_config(),
    );

    drive(&mut drivers, async {
        control.quad_mut().init_positions().await.unwrap();
        assert_eq!(control.tick().await, Tick::Walked);
        assert_eq!(control.tick().await, Tick::Idle);
    });

    assert_eq!(control.quad().completed_cycles(), 1);
    for id in LegId::ALL {
        let runs = log.for_leg(id).iter().filter(|m| m.blocking).count();
        assert_eq!(runs, 4 * 34);
    }
}
