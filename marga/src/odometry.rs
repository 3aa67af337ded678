//! Dead-reckoning odometry
//!
//! Converts encoder counts into travel and rotation and integrates them into
//! a 2D pose. Headings are degrees measured from the +Y axis, positive
//! towards +X (clockwise seen from above), and are never wrapped: a robot
//! that turns right twice by 270° reports 540°.
//!
//! Position is integrated per motion segment: a [`SegmentOrigin`] is taken at
//! the start of every rotation or straight move and the pose is recomputed
//! from it as `origin + r·(sin θ, cos θ)` on every poll.

use crate::config::CalibrationConfig;
use crate::encoder::TickSnapshot;

/// Robot pose: position (cm) and heading (degrees from +Y, unbounded)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }
}

/// Position anchor of the current motion segment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentOrigin {
    pub x0: f64,
    pub y0: f64,
}

impl SegmentOrigin {
    /// Snapshot the position of a pose
    pub fn of(pose: &Pose) -> Self {
        Self {
            x0: pose.x,
            y0: pose.y,
        }
    }
}

/// Encoder calibration of the drive train
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Odometry {
    /// Travel per count (cm)
    pub distance_per_count: f64,
    /// In-place rotation per count (degrees)
    pub degrees_per_count: f64,
}

impl Odometry {
    pub fn new(distance_per_count: f64, degrees_per_count: f64) -> Self {
        Self {
            distance_per_count,
            degrees_per_count,
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.distance_per_count, config.degrees_per_count)
    }

    /// Angle turned in place, from the average of both wheels
    #[inline]
    pub fn angle_from_counts(&self, counts: TickSnapshot) -> f64 {
        self.degrees_per_count * counts.sum() as f64 / 2.0
    }

    /// Distance travelled, from the average of both wheels
    #[inline]
    pub fn distance_from_counts(&self, counts: TickSnapshot) -> f64 {
        self.distance_per_count * counts.sum() as f64 / 2.0
    }

    /// Whole encoder counts needed to turn by `degrees` (sign ignored)
    #[inline]
    pub fn required_counts(&self, degrees: f64) -> u64 {
        (degrees.abs() / self.degrees_per_count).floor() as u64
    }
}

impl Default for Odometry {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }
}

/// Polar-to-Cartesian step from a segment origin.
///
/// Heading is measured from the +Y axis, hence `x` uses the sine and `y` the
/// cosine. The planner's `atan2(dx, dy)` relies on the same convention.
pub fn integrate_pose(origin: SegmentOrigin, heading_degrees: f64, distance: f64) -> Pose {
    let theta = heading_degrees.to_radians();
    Pose {
        x: origin.x0 + distance * theta.sin(),
        y: origin.y0 + distance * theta.cos(),
        heading: heading_degrees,
    }
}
