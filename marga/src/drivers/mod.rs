//! Hardware collaborator traits
//!
//! The navigation core only talks to hardware through these traits. Timer,
//! ADC and UART bring-up belong to the implementations.

pub mod clock;
pub mod display;
pub mod motor;
pub mod sensor;

pub use clock::Clock;
pub use display::{Display, LogDisplay, TextPanel};
pub use motor::{Direction, MotorDriver};
pub use sensor::RangeSensor;

/// Collaborators owned by the navigator
pub struct Hardware {
    pub motors: Box<dyn MotorDriver>,
    pub sensor: Box<dyn RangeSensor>,
    pub display: Box<dyn Display>,
    pub clock: Box<dyn Clock>,
}
