//! Marga - dead-reckoning navigation core for a differential-drive robot
//!
//! Wheel encoder counts feed a pose estimate that drives closed-loop turns
//! and straight moves. A forward range sensor interrupts moves that would hit
//! an obstacle; the navigator then deflects left around it and replans to its
//! goal. Single-byte commands on a serial link jog the robot or send it home.
//!
//! Hardware is reached only through the traits in [`drivers`]. The bundled
//! backend is a simulator ([`devices::mock::SimulatedRobot`]).

pub mod config;
pub mod devices;
pub mod drivers;
pub mod encoder;
pub mod error;
pub mod motion;
pub mod navigation;
pub mod odometry;
pub mod ranging;
pub mod remote;
pub mod telemetry;
pub mod transport;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use navigation::{Navigator, Point};
