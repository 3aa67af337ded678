//! Obstacle deflection maneuver
//!
//! When a straight move reports a blocked range, the robot turns left in
//! fixed steps until the forward estimate clears the reference distance by
//! the clearance margin, then drives forward far enough to get past the
//! obstacle edge before replanning to its goal:
//!
//! ```text
//!   Clearing ──range clear──▶ Compensating ──advance done──▶ Replanning
//!      │ ▲                         │
//!      └─┘ blocked: turn left      └─ advance blocked: start a new maneuver
//! ```
//!
//! The advance after `n` clearing turns is `base / cos(step·n) + offset`.
//! It grows with the turned angle and blows up near 90°, so non-finite or
//! non-positive distances skip straight to replanning.

use crate::config::{CalibrationConfig, MotionConfig};

/// Tuning of the maneuver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeflectionParams {
    /// Left turn per clearing step (degrees)
    pub step_degrees: f64,
    /// Range that ends the clearing phase (mm)
    pub clearance: f64,
    /// Compensation numerator (cm)
    pub compensation_base: f64,
    /// Compensation offset (cm)
    pub compensation_offset: f64,
}

impl DeflectionParams {
    pub fn from_config(calibration: &CalibrationConfig, motion: &MotionConfig) -> Self {
        Self {
            step_degrees: motion.deflection_step_degrees,
            clearance: calibration.clearance_distance(),
            compensation_base: motion.compensation_base,
            compensation_offset: motion.compensation_offset,
        }
    }

    /// Advance after `turns` clearing steps
    pub fn compensation_distance(&self, turns: u32) -> f64 {
        let angle = (self.step_degrees * turns as f64).to_radians();
        self.compensation_base / angle.cos() + self.compensation_offset
    }
}

impl Default for DeflectionParams {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default(), &MotionConfig::default())
    }
}

/// Phase of the maneuver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeflectionState {
    Clearing { turns: u32 },
    Compensating { turns: u32, distance: f64 },
    Replanning { turns: u32 },
}

/// Motion the navigator must perform next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeflectionAction {
    /// Rotate left by this many degrees, then sample the range again
    RotateLeft(f64),
    /// Drive straight ahead by this many cm
    Advance(f64),
    /// Plan a fresh leg to the goal
    Replan,
}

/// One deflection maneuver, from the blocked reading to the replan
#[derive(Debug, Clone)]
pub struct Deflection {
    params: DeflectionParams,
    state: DeflectionState,
}

impl Deflection {
    pub fn new(params: DeflectionParams) -> Self {
        Self {
            params,
            state: DeflectionState::Clearing { turns: 0 },
        }
    }

    pub fn state(&self) -> DeflectionState {
        self.state
    }

    #[cfg(test)]
    fn with_state(params: DeflectionParams, state: DeflectionState) -> Self {
        Self { params, state }
    }

    /// Clearing turns taken so far
    pub fn turns(&self) -> u32 {
        match self.state {
            DeflectionState::Clearing { turns }
            | DeflectionState::Compensating { turns, .. }
            | DeflectionState::Replanning { turns } => turns,
        }
    }

    /// Feed a range sample taken after the last clearing turn (or the
    /// blocked reading that started the maneuver)
    pub fn observe(&mut self, range: u32) -> DeflectionAction {
        match self.state {
            DeflectionState::Clearing { turns } => {
                if (range as f64) < self.params.clearance {
                    self.state = DeflectionState::Clearing {
                        turns: turns.saturating_add(1),
                    };
                    DeflectionAction::RotateLeft(self.params.step_degrees)
                } else {
                    self.begin_compensation(turns)
                }
            }
            DeflectionState::Compensating { distance, .. } => DeflectionAction::Advance(distance),
            DeflectionState::Replanning { .. } => DeflectionAction::Replan,
        }
    }

    /// The compensating advance finished without being blocked
    pub fn compensated(&mut self) -> DeflectionAction {
        self.state = DeflectionState::Replanning {
            turns: self.turns(),
        };
        DeflectionAction::Replan
    }

    fn begin_compensation(&mut self, turns: u32) -> DeflectionAction {
        let distance = self.params.compensation_distance(turns);
        if distance.is_finite() && distance > 0.0 {
            self.state = DeflectionState::Compensating { turns, distance };
            DeflectionAction::Advance(distance)
        } else {
            log::warn!(
                "Deflection: compensation {} after {} turns is unusable, replanning",
                distance,
                turns
            );
            self.state = DeflectionState::Replanning { turns };
            DeflectionAction::Replan
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const BLOCKED: u32 = 90;
    const CLEAR: u32 = 200;

    #[test]
    fn test_three_turns_then_compensate() {
        let params = DeflectionParams::default();
        let mut maneuver = Deflection::new(params);

        // Blocked reading that started the maneuver plus two more
        for _ in 0..3 {
            assert_eq!(maneuver.observe(BLOCKED), DeflectionAction::RotateLeft(25.0));
        }
        assert_eq!(maneuver.turns(), 3);

        let expected = 10.0 / 75f64.to_radians().cos() + 5.0;
        match maneuver.observe(CLEAR) {
            DeflectionAction::Advance(distance) => {
                assert_abs_diff_eq!(distance, expected, epsilon = 1e-9);
                assert_abs_diff_eq!(distance, 43.637, epsilon = 1e-3);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(maneuver.compensated(), DeflectionAction::Replan);
        assert_eq!(maneuver.state(), DeflectionState::Replanning { turns: 3 });
        assert_eq!(maneuver.turns(), 3);
        assert_eq!(maneuver.observe(CLEAR), DeflectionAction::Replan);
    }

    #[test]
    fn test_clear_at_first_sample_still_compensates() {
        let mut maneuver = Deflection::new(DeflectionParams::default());
        // 129 < 130 keeps turning, 130 is clear
        assert!(matches!(maneuver.observe(129), DeflectionAction::RotateLeft(_)));
        match maneuver.observe(130) {
            DeflectionAction::Advance(distance) => {
                let expected = 10.0 / 25f64.to_radians().cos() + 5.0;
                assert_abs_diff_eq!(distance, expected, epsilon = 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_turns_advances_base_plus_offset() {
        let params = DeflectionParams::default();
        assert_abs_diff_eq!(params.compensation_distance(0), 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unusable_compensation_skips_to_replan() {
        let mut maneuver = Deflection::new(DeflectionParams::default());
        // Four steps of 25° put cos(100°) below zero
        for _ in 0..4 {
            maneuver.observe(BLOCKED);
        }
        assert_eq!(maneuver.observe(CLEAR), DeflectionAction::Replan);
        assert_eq!(maneuver.state(), DeflectionState::Replanning { turns: 4 });

        let params = DeflectionParams {
            step_degrees: 45.0,
            ..DeflectionParams::default()
        };
        assert!(params.compensation_distance(2).abs() > 1e12);
        let mut maneuver = Deflection::new(params);
        maneuver.observe(BLOCKED);
        maneuver.observe(BLOCKED);
        // cos(90°) is a tiny positive number; the distance is finite but huge
        assert!(matches!(maneuver.observe(CLEAR), DeflectionAction::Advance(_)));
    }

    #[test]
    fn test_observe_after_compensating_repeats_advance() {
        let mut maneuver = Deflection::new(DeflectionParams::default());
        let first = maneuver.observe(CLEAR);
        assert_eq!(maneuver.observe(BLOCKED), first);
    }

    #[test]
    fn test_turn_counter_saturates() {
        let mut maneuver = Deflection::with_state(
            DeflectionParams::default(),
            DeflectionState::Clearing { turns: u32::MAX },
        );
        assert_eq!(maneuver.observe(BLOCKED), DeflectionAction::RotateLeft(25.0));
        assert_eq!(maneuver.turns(), u32::MAX);
        assert_eq!(
            maneuver.state(),
            DeflectionState::Clearing { turns: u32::MAX }
        );
    }
}
