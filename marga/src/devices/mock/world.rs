//! Obstacle world for the forward range sensor
//!
//! Obstacles are circles in the navigation frame (cm). The sensor looks
//! along the robot heading, so the ray direction is `(sin θ, cos θ)`.

use crate::config::ObstacleConfig;
use crate::odometry::Pose;

/// Circular obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl From<&ObstacleConfig> for Obstacle {
    fn from(config: &ObstacleConfig) -> Self {
        Self {
            x: config.x,
            y: config.y,
            radius: config.radius,
        }
    }
}

impl Obstacle {
    /// Distance along the ray to the first contact, if any
    fn intersect(&self, px: f64, py: f64, ux: f64, uy: f64) -> Option<f64> {
        let cx = self.x - px;
        let cy = self.y - py;
        let along = cx * ux + cy * uy;
        let miss_sq = cx * cx + cy * cy - along * along;
        let radius_sq = self.radius * self.radius;
        if miss_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - miss_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Inside the obstacle
            Some(0.0)
        } else {
            None
        }
    }
}

/// Static set of obstacles
#[derive(Debug, Clone, Default)]
pub struct World {
    obstacles: Vec<Obstacle>,
}

impl World {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn from_config(obstacles: &[ObstacleConfig]) -> Self {
        Self::new(obstacles.iter().map(Obstacle::from).collect())
    }

    /// Nearest obstacle straight ahead of `pose` within `max_range` (cm)
    pub fn ray_cast(&self, pose: &Pose, max_range: f64) -> Option<f64> {
        let theta = pose.heading.to_radians();
        let (ux, uy) = (theta.sin(), theta.cos());
        self.obstacles
            .iter()
            .filter_map(|o| o.intersect(pose.x, pose.y, ux, uy))
            .filter(|&d| d <= max_range)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn world() -> World {
        World::new(vec![
            Obstacle {
                x: 0.0,
                y: 50.0,
                radius: 10.0,
            },
            Obstacle {
                x: 0.0,
                y: 30.0,
                radius: 5.0,
            },
        ])
    }

    #[test]
    fn test_nearest_hit_ahead() {
        let d = world().ray_cast(&Pose::new(0.0, 0.0, 0.0), 100.0);
        assert_abs_diff_eq!(d.unwrap(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_miss_and_behind() {
        let world = world();
        assert_eq!(world.ray_cast(&Pose::new(0.0, 0.0, 90.0), 100.0), None);
        assert_eq!(world.ray_cast(&Pose::new(0.0, 0.0, 180.0), 100.0), None);
        assert_eq!(world.ray_cast(&Pose::new(0.0, 0.0, 0.0), 20.0), None);
    }

    #[test]
    fn test_inside_reads_zero() {
        let d = world().ray_cast(&Pose::new(0.0, 50.0, 45.0), 100.0);
        assert_eq!(d, Some(0.0));
    }
}
