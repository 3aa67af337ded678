//! Shared fixtures for the integration tests

#![allow(dead_code)]

use marga::config::AppConfig;
use marga::devices::mock::SimulatedRobot;
use marga::encoder::EncoderTicks;
use marga::navigation::Navigator;
use marga::odometry::Pose;
use std::sync::Arc;

/// Raw reading converted to ~881 mm: clear
pub const CLEAR_READING: u8 = 20;
/// Raw reading converted to ~61 mm: blocked and below clearance
pub const BLOCKED_READING: u8 = 200;

/// Default configuration with a stall guard so a broken loop fails instead
/// of hanging the test run
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.motion.stall_timeout_ms = Some(2_000);
    config
}

pub struct Rig {
    pub navigator: Navigator,
    pub robot: SimulatedRobot,
    pub ticks: Arc<EncoderTicks>,
}

/// Navigator and simulator that agree on the start pose
pub fn rig_at(config: &AppConfig, start: Pose) -> Rig {
    let mut config = config.clone();
    config.simulation.start_x = start.x;
    config.simulation.start_y = start.y;
    config.simulation.start_heading = start.heading;

    let ticks = Arc::new(EncoderTicks::new());
    let robot = SimulatedRobot::new(&config.simulation, &config.calibration, Arc::clone(&ticks));
    let mut navigator = Navigator::new(&config, Arc::clone(&ticks), robot.hardware());
    navigator.set_pose(start);

    Rig {
        navigator,
        robot,
        ticks,
    }
}

pub fn rig() -> Rig {
    rig_at(&test_config(), Pose::default())
}
