//! Motion primitives
//!
//! Both primitives are pure step functions over encoder snapshots. The
//! navigator owns the poll loop that drives them against real or simulated
//! hardware.

pub mod linear;
pub mod rotation;
pub mod stall;

pub use linear::{LinearMove, LinearStep};
pub use rotation::{Rotation, RotationStep, Turn};
pub use stall::StallWatch;
