//! Hardware backends

pub mod mock;

use crate::config::AppConfig;
use crate::drivers::Hardware;
use crate::encoder::EncoderTicks;
use crate::error::{Error, Result};
use mock::SimulatedRobot;
use std::sync::Arc;

/// Build the collaborators selected by `device.type`.
///
/// Encoder edges from the backend are delivered into `ticks`.
pub fn create_device(config: &AppConfig, ticks: Arc<EncoderTicks>) -> Result<Hardware> {
    match config.device.device_type.as_str() {
        "sim" => {
            log::info!("Devices: creating simulated robot '{}'", config.device.name);
            let robot = SimulatedRobot::new(&config.simulation, &config.calibration, ticks);
            Ok(robot.hardware())
        }
        _ => Err(Error::UnknownDevice(config.device.device_type.clone())),
    }
}
