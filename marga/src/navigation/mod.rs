//! Path planning, obstacle deflection and the navigator that drives them

pub mod deflection;
pub mod navigator;
pub mod planner;

pub use deflection::{Deflection, DeflectionAction, DeflectionParams, DeflectionState};
pub use navigator::{MoveOutcome, Navigator};
pub use planner::{Leg, Point};
