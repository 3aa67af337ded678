//! Navigator - owner of the pose and driver of the motion primitives
//!
//! All motion is cooperative: each primitive polls the encoder counters,
//! updates the pose, reports it and then suspends on [`Clock::delay`] until
//! the next poll. Encoder edges are delivered concurrently into the shared
//! [`EncoderTicks`], so the only state shared with interrupt context is that
//! packed counter.
//!
//! Navigation to a goal is a loop rather than a call chain: a leg is planned,
//! driven, and when the path is blocked the deflection maneuver runs and the
//! next iteration replans from wherever it left the robot. The interrupted
//! leg is never resumed.
//!
//! [`Clock::delay`]: crate::drivers::Clock::delay

use super::deflection::{Deflection, DeflectionAction, DeflectionParams};
use super::planner::{Leg, Point};
use crate::config::{AppConfig, CalibrationConfig, MotionConfig};
use crate::drivers::{Direction, Hardware};
use crate::encoder::{EncoderTicks, TickSnapshot};
use crate::error::Result;
use crate::motion::{LinearMove, LinearStep, Rotation, StallWatch};
use crate::odometry::{Odometry, Pose, SegmentOrigin};
use crate::ranging::RangeCurve;
use crate::telemetry::Telemetry;

use std::sync::Arc;

/// How a straight move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target distance exceeded
    Completed,
    /// Range estimate fell below the reference distance
    Blocked { range: u32 },
}

/// Dead-reckoning navigator
pub struct Navigator {
    pub(crate) odometry: Odometry,
    pub(crate) curve: RangeCurve,
    pub(crate) calibration: CalibrationConfig,
    pub(crate) motion: MotionConfig,
    pub(crate) pose: Pose,
    pub(crate) origin: SegmentOrigin,
    pub(crate) goal: Point,
    pub(crate) ticks: Arc<EncoderTicks>,
    pub(crate) hw: Hardware,
    pub(crate) telemetry: Telemetry,
}

impl Navigator {
    /// Create a navigator at the origin facing +Y
    pub fn new(config: &AppConfig, ticks: Arc<EncoderTicks>, hardware: Hardware) -> Self {
        Self {
            odometry: Odometry::from_config(&config.calibration),
            curve: RangeCurve::from_config(&config.calibration),
            calibration: config.calibration.clone(),
            motion: config.motion.clone(),
            pose: Pose::default(),
            origin: SegmentOrigin::default(),
            goal: config.motion.home_point(),
            ticks,
            hw: hardware,
            telemetry: Telemetry,
        }
    }

    // === State ===

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn segment_origin(&self) -> SegmentOrigin {
        self.origin
    }

    /// Goal of the last `navigate_to` (home until one runs)
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Override the believed pose and re-anchor the segment origin
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.origin = SegmentOrigin::of(&pose);
    }

    /// Write the whole pose to the display
    pub fn report(&mut self) -> Result<()> {
        self.telemetry.heading(self.hw.display.as_mut(), self.pose.heading)?;
        self.telemetry.position(self.hw.display.as_mut(), &self.pose)
    }

    /// Release both wheels
    pub fn stop(&mut self) -> Result<()> {
        self.hw.motors.stop()
    }

    /// Read the forward range sensor and convert it to millimetres
    pub fn sample_range(&mut self) -> Result<u32> {
        let reading = self.hw.sensor.read(self.calibration.sensor_channel)?;
        let range = self.curve.convert(reading);
        log::trace!("Navigator: range reading {} -> {}mm", reading, range);
        Ok(range)
    }

    // === Primitives ===

    /// Rotate in place by a signed angle (positive turns right)
    pub fn rotate_by(&mut self, relative_degrees: f64) -> Result<()> {
        self.origin = SegmentOrigin::of(&self.pose);
        let rotation = Rotation::new(relative_degrees, self.pose.heading, &self.odometry);
        log::debug!(
            "Navigator: rotating {:?} by {:.2}° ({} counts) from {:.2}°",
            rotation.turn(),
            relative_degrees.abs(),
            rotation.required_counts(),
            self.pose.heading
        );

        self.hw.motors.set_direction(rotation.turn().direction())?;
        self.ticks.reset();
        let outcome = self.poll_rotation(&rotation);
        self.finish(outcome)
    }

    /// Drive straight ahead, deflecting around obstacles.
    ///
    /// A blocked move is not resumed: after the deflection the navigator
    /// replans to its current goal.
    pub fn move_forward(&mut self, distance: f64) -> Result<()> {
        match self.advance(distance)? {
            MoveOutcome::Completed => Ok(()),
            MoveOutcome::Blocked { range } => {
                self.deflect(range)?;
                self.drive_to_goal()
            }
        }
    }

    /// Travel to `goal` by rotate-then-move legs, replanning after every
    /// deflection
    pub fn navigate_to(&mut self, goal: Point) -> Result<()> {
        log::info!(
            "Navigator: navigating from ({:.1}, {:.1}) to ({:.1}, {:.1})",
            self.pose.x,
            self.pose.y,
            goal.x,
            goal.y
        );
        self.goal = goal;
        self.drive_to_goal()?;
        log::info!(
            "Navigator: reached ({:.1}, {:.1}) heading {:.1}°",
            self.pose.x,
            self.pose.y,
            self.pose.heading
        );
        Ok(())
    }

    // === Internals ===

    fn drive_to_goal(&mut self) -> Result<()> {
        loop {
            let leg = Leg::toward(&self.pose, self.goal);
            log::debug!(
                "Navigator: leg heading {:.2}° distance {:.2}cm",
                leg.heading,
                leg.distance
            );
            let speed = self.motion.traverse_speed;
            self.hw.motors.set_velocity(speed, speed)?;

            match self.line_move(&leg)? {
                MoveOutcome::Completed => return Ok(()),
                MoveOutcome::Blocked { range } => self.deflect(range)?,
            }
        }
    }

    /// Face the leg heading, then advance the leg distance along it
    fn line_move(&mut self, leg: &Leg) -> Result<MoveOutcome> {
        let turn = leg.turn_from(self.pose.heading);
        if turn != 0.0 {
            self.rotate_by(turn)?;
        }
        self.advance(leg.distance)
    }

    /// Straight move without deflection
    fn advance(&mut self, distance: f64) -> Result<MoveOutcome> {
        self.origin = SegmentOrigin::of(&self.pose);
        let linear = LinearMove::new(
            self.origin,
            self.pose.heading,
            distance,
            self.calibration.reference_distance,
        );
        log::debug!(
            "Navigator: advancing {:.2}cm at {:.2}°",
            distance,
            self.pose.heading
        );

        self.ticks.reset();
        self.hw.motors.set_direction(Direction::Forward)?;
        let outcome = self.poll_linear(&linear);
        self.finish(outcome)
    }

    /// Turn left until clear, compensate, and return once a replan is due
    fn deflect(&mut self, blocked_range: u32) -> Result<()> {
        let params = DeflectionParams::from_config(&self.calibration, &self.motion);
        let mut range = blocked_range;

        loop {
            log::info!(
                "Navigator: obstacle at {}mm, deflecting from ({:.1}, {:.1})",
                range,
                self.pose.x,
                self.pose.y
            );
            let mut maneuver = Deflection::new(params);
            let mut action = maneuver.observe(range);

            loop {
                match action {
                    DeflectionAction::RotateLeft(step) => {
                        self.rotate_by(-step)?;
                        range = self.sample_range()?;
                        action = maneuver.observe(range);
                    }
                    DeflectionAction::Advance(distance) => {
                        log::debug!(
                            "Navigator: clear after {} turns, compensating {:.2}cm",
                            maneuver.turns(),
                            distance
                        );
                        match self.advance(distance)? {
                            MoveOutcome::Completed => action = maneuver.compensated(),
                            MoveOutcome::Blocked { range: blocked } => {
                                range = blocked;
                                break;
                            }
                        }
                    }
                    DeflectionAction::Replan => return Ok(()),
                }
            }
        }
    }

    fn poll_rotation(&mut self, rotation: &Rotation) -> Result<()> {
        let mut watch = StallWatch::new(self.motion.stall_timeout(), self.hw.clock.elapsed());
        loop {
            let counts = self.ticks.snapshot();
            let step = rotation.step(counts, &self.odometry);
            self.pose.heading = step.heading;
            self.telemetry.heading(self.hw.display.as_mut(), step.heading)?;
            if step.done {
                return Ok(());
            }
            self.wait(&mut watch, counts)?;
        }
    }

    fn poll_linear(&mut self, linear: &LinearMove) -> Result<MoveOutcome> {
        let mut watch = StallWatch::new(self.motion.stall_timeout(), self.hw.clock.elapsed());
        loop {
            let range = self.sample_range()?;
            let counts = self.ticks.snapshot();
            match linear.step(range, counts, &self.odometry) {
                LinearStep::Blocked { range } => {
                    log::debug!("Navigator: blocked at {}mm", range);
                    return Ok(MoveOutcome::Blocked { range });
                }
                LinearStep::Advancing { pose, travelled } => {
                    self.pose = pose;
                    self.report_travel(travelled)?;
                }
                LinearStep::Arrived { pose, travelled } => {
                    self.pose = pose;
                    self.report_travel(travelled)?;
                    return Ok(MoveOutcome::Completed);
                }
            }
            self.wait(&mut watch, counts)?;
        }
    }

    fn report_travel(&mut self, travelled: f64) -> Result<()> {
        self.telemetry.distance(self.hw.display.as_mut(), travelled)?;
        self.telemetry.position(self.hw.display.as_mut(), &self.pose)
    }

    fn wait(&mut self, watch: &mut StallWatch, counts: TickSnapshot) -> Result<()> {
        if let Err(e) = watch.check(counts, self.hw.clock.elapsed()) {
            log::error!("Navigator: {}", e);
            return Err(e);
        }
        self.hw.clock.delay(self.motion.poll_interval());
        Ok(())
    }

    /// Stop the motors after a primitive, keeping its error first
    pub(crate) fn finish<T>(&mut self, outcome: Result<T>) -> Result<T> {
        let stopped = self.hw.motors.stop();
        let value = outcome?;
        stopped?;
        Ok(value)
    }
}
