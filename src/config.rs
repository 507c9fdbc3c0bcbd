//! Physical, gait and control-loop constants, plus the runtime config structs
//! built from them.
//!
//! Distances are in inches, durations are [`embassy_time::Duration`].
use embassy_time::Duration;

// ROBOT SIZE
/// Length of both the upper and the lower leg segment.
pub const LEG_PART_LENGTH: f64 = 6.4375;

/// Number of waypoints in a leg trajectory.
pub const FRAMEBUFFER_SIZE: usize = 17;

// BODY
pub const INITIAL_BODY_X: f64 = 0.0;
pub const INITIAL_BODY_Y: f64 = 10.0;

// GAIT
pub const FOOT_STEP_FORWARD: f64 = 1.5;
pub const FOOT_STEP_LIFT: f64 = 1.0;
pub const FOOT_SLIDE_BACK: f64 = -0.5;
pub const WALK_WAIT: Duration = Duration::from_millis(1000);

// CONTROL LOOP
pub const CONTROL_PERIOD: Duration = Duration::from_millis(10);
/// Raw controller axis position to inches of body travel per tick.
pub const CONTROLLER_SENSITIVITY: f64 = 0.001;
/// Walking is refused when an obstacle is closer than this.
pub const FRONT_MIN_DISTANCE: f64 = 5.0;
pub const WALK_COOLDOWN: Duration = Duration::from_millis(3000);

/// Step/slide sizes and phase timing used by the gait sequencer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitConfig {
    pub step_forward: f64,
    pub step_lift: f64,
    pub slide: f64,
    /// Fixed wait between phases. Not a completion signal: a leg slower than
    /// this is still moving when the next phase starts.
    pub walk_wait: Duration,
}

impl GaitConfig {
    pub const fn new() -> Self {
        Self {
            step_forward: FOOT_STEP_FORWARD,
            step_lift: FOOT_STEP_LIFT,
            slide: FOOT_SLIDE_BACK,
            walk_wait: WALK_WAIT,
        }
    }

    pub const fn with_walk_wait(mut self, walk_wait: Duration) -> Self {
        self.walk_wait = walk_wait;
        self
    }
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlConfig {
    pub period: Duration,
    pub sensitivity: f64,
    pub front_min_distance: f64,
    pub walk_cooldown: Duration,
}

impl ControlConfig {
    pub const fn new() -> Self {
        Self {
            period: CONTROL_PERIOD,
            sensitivity: CONTROLLER_SENSITIVITY,
            front_min_distance: FRONT_MIN_DISTANCE,
            walk_cooldown: WALK_COOLDOWN,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::new()
    }
}
