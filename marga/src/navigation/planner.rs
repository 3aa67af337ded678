//! Straight-line leg planning
//!
//! A leg is the heading and distance of the single straight segment from
//! the current pose to a goal. Headings use the odometry convention
//! (degrees from +Y), so the bearing is `atan2(dx, dy)`.

use crate::odometry::Pose;

/// Point in the plane (cm)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Heading and distance of a straight segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Absolute heading to face (degrees from +Y, in [-180, 180])
    pub heading: f64,
    /// Distance to travel (cm)
    pub distance: f64,
}

impl Leg {
    /// Leg from `from` to `goal`
    pub fn toward(from: &Pose, goal: Point) -> Self {
        let dx = goal.x - from.x;
        let dy = goal.y - from.y;
        Self {
            heading: dx.atan2(dy).to_degrees(),
            distance: dx.hypot(dy),
        }
    }

    /// Relative turn needed from `current_heading`.
    ///
    /// Not wrapped: the result can exceed ±180° when the current heading has
    /// accumulated several turns.
    pub fn turn_from(&self, current_heading: f64) -> f64 {
        self.heading - current_heading
    }
}
