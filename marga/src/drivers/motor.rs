//! Motor driver trait

use crate::error::Result;

/// Drive direction of the H-bridge pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Both wheels forward
    Forward,
    /// Both wheels backward
    Backward,
    /// Spin in place counter-clockwise (heading decreases)
    Left,
    /// Spin in place clockwise (heading increases)
    Right,
    /// Both wheels released
    Stop,
}

/// Motor controller driver trait
pub trait MotorDriver: Send {
    /// Select the drive direction
    fn set_direction(&mut self, direction: Direction) -> Result<()>;

    /// Set PWM duty of each wheel (0-255)
    fn set_velocity(&mut self, left: u8, right: u8) -> Result<()>;

    /// Release both wheels
    fn stop(&mut self) -> Result<()> {
        self.set_direction(Direction::Stop)
    }
}
