//! Closed-loop in-place rotation
//!
//! The turn runs until the average of both wheel counters reaches
//! `floor(|angle| / degrees_per_count)`. The heading is rewritten on every
//! poll from the initial heading and the angle turned so far.

use crate::drivers::Direction;
use crate::encoder::TickSnapshot;
use crate::odometry::Odometry;

/// Turn direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise, heading decreases
    Left,
    /// Clockwise, heading increases
    Right,
}

impl Turn {
    /// Direction for a signed relative angle (positive turns right)
    pub fn for_angle(relative_degrees: f64) -> Self {
        if relative_degrees < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Left => Direction::Left,
            Self::Right => Direction::Right,
        }
    }
}

/// Result of one rotation poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStep {
    /// Heading after the angle turned so far
    pub heading: f64,
    /// Required counts reached; the motors must stop
    pub done: bool,
}

/// Rotation by a relative angle, started at a known heading
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    turn: Turn,
    initial_heading: f64,
    required_counts: u64,
}

impl Rotation {
    pub fn new(relative_degrees: f64, initial_heading: f64, odometry: &Odometry) -> Self {
        Self {
            turn: Turn::for_angle(relative_degrees),
            initial_heading,
            required_counts: odometry.required_counts(relative_degrees),
        }
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn required_counts(&self) -> u64 {
        self.required_counts
    }

    /// Evaluate the counters accumulated since the turn started
    pub fn step(&self, counts: TickSnapshot, odometry: &Odometry) -> RotationStep {
        let angle = odometry.angle_from_counts(counts);
        let heading = match self.turn {
            Turn::Left => self.initial_heading - angle,
            Turn::Right => self.initial_heading + angle,
        };
        RotationStep {
            heading,
            done: counts.average() >= self.required_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_direction_from_sign() {
        let odom = Odometry::default();
        assert_eq!(Rotation::new(30.0, 0.0, &odom).turn(), Turn::Right);
        assert_eq!(Rotation::new(-30.0, 0.0, &odom).turn(), Turn::Left);
        assert_eq!(Turn::Left.direction(), Direction::Left);
        assert_eq!(Turn::Right.direction(), Direction::Right);
    }

    #[test]
    fn test_completes_exactly_at_required_average() {
        let odom = Odometry::default();
        for degrees in [4.0, 25.0, 45.0, 90.0, 165.0, 359.0] {
            let rotation = Rotation::new(degrees, 0.0, &odom);
            let required = (degrees / 4.090f64).floor() as u64;
            assert_eq!(rotation.required_counts(), required);

            // Alternate wheels so odd sums are exercised too
            let mut counts = TickSnapshot::default();
            for i in 0..(2 * required + 4) {
                let step = rotation.step(counts, &odom);
                assert_eq!(
                    step.done,
                    counts.average() >= required,
                    "{}° at {:?}",
                    degrees,
                    counts
                );
                if i % 2 == 0 {
                    counts.left += 1;
                } else {
                    counts.right += 1;
                }
            }
        }
    }

    #[test]
    fn test_zero_angle_is_done_immediately() {
        let odom = Odometry::default();
        let rotation = Rotation::new(0.0, 12.0, &odom);
        let step = rotation.step(TickSnapshot::default(), &odom);
        assert!(step.done);
        assert_eq!(step.heading, 12.0);
    }

    #[test]
    fn test_heading_follows_turn_direction() {
        let odom = Odometry::default();
        let counts = TickSnapshot::new(11, 11);

        let right = Rotation::new(90.0, 10.0, &odom).step(counts, &odom);
        assert_abs_diff_eq!(right.heading, 10.0 + 44.99, epsilon = 1e-9);
        assert!(!right.done);

        let left = Rotation::new(-45.0, 10.0, &odom).step(counts, &odom);
        assert_abs_diff_eq!(left.heading, 10.0 - 44.99, epsilon = 1e-9);
        assert!(left.done);
    }
}
