//! Command execution on the navigator
//!
//! Jogs are open-loop pulses: drive for a fixed time, stop, let the wheels
//! settle, then fold whatever the encoders counted into the pose. The
//! forward jog uses the tick sum and the back jog twice the integer average,
//! so the two are not exact mirrors of each other.

use super::command::RemoteCommand;
use crate::drivers::Direction;
use crate::encoder::TickSnapshot;
use crate::error::Result;
use crate::motion::Turn;
use crate::navigation::Navigator;
use crate::odometry::{SegmentOrigin, integrate_pose};

use std::time::Duration;

impl Navigator {
    /// Handle one received byte.
    ///
    /// Every byte, recognised or not, clears the encoder counters and takes
    /// a fresh range sample before being decoded.
    pub fn handle_byte(&mut self, byte: u8) -> Result<()> {
        self.ticks.reset();
        let range = self.sample_range()?;
        match RemoteCommand::from_byte(byte) {
            Some(command) => self.execute(command, range),
            None => {
                log::debug!("Remote: ignoring byte {:#04x}", byte);
                Ok(())
            }
        }
    }

    /// Run a decoded command with the range sampled on its arrival
    pub fn execute(&mut self, command: RemoteCommand, range: u32) -> Result<()> {
        log::info!("Remote: {:?} (range {}mm)", command, range);
        match command {
            RemoteCommand::ForwardJog => self.jog_forward(range),
            RemoteCommand::BackJog => self.jog_back(),
            RemoteCommand::LeftJog => self.jog_turn(Turn::Left),
            RemoteCommand::RightJog => self.jog_turn(Turn::Right),
            RemoteCommand::ReturnToOrigin => {
                let home = self.motion.home_point();
                self.navigate_to(home)
            }
        }
    }

    fn jog_forward(&mut self, range: u32) -> Result<()> {
        if (range as f64) <= self.calibration.reference_distance {
            log::warn!("Remote: forward jog refused, obstacle at {}mm", range);
            return Ok(());
        }

        self.origin = SegmentOrigin::of(&self.pose);
        let counts = self.pulse(Direction::Forward, self.motion.jog_linear_ms)?;
        let distance = self.odometry.distance_per_count * counts.sum() as f64;
        self.pose = integrate_pose(self.origin, self.pose.heading, distance);
        self.telemetry
            .position(self.hw.display.as_mut(), &self.pose)
    }

    fn jog_back(&mut self) -> Result<()> {
        let start = SegmentOrigin::of(&self.pose);
        let counts = self.pulse(Direction::Backward, self.motion.jog_linear_ms)?;
        let distance = counts.average() as f64 * self.odometry.distance_per_count * 2.0;
        self.pose = integrate_pose(start, self.pose.heading, -distance);
        self.origin = SegmentOrigin::of(&self.pose);
        self.telemetry
            .position(self.hw.display.as_mut(), &self.pose)
    }

    fn jog_turn(&mut self, turn: Turn) -> Result<()> {
        let counts = self.pulse(turn.direction(), self.motion.jog_turn_ms)?;
        let angle = self.odometry.angle_from_counts(counts) * self.motion.jog_turn_gain;
        self.pose.heading += match turn {
            Turn::Left => -angle,
            Turn::Right => angle,
        };
        self.telemetry
            .heading(self.hw.display.as_mut(), self.pose.heading)
    }

    /// Drive for `millis`, stop, settle, and take the counts
    fn pulse(&mut self, direction: Direction, millis: u64) -> Result<TickSnapshot> {
        let speed = self.motion.jog_speed;
        self.hw.motors.set_velocity(speed, speed)?;
        self.hw.motors.set_direction(direction)?;
        self.hw.clock.delay(Duration::from_millis(millis));
        self.hw.motors.stop()?;
        self.hw
            .clock
            .delay(Duration::from_millis(self.motion.settle_ms));
        let counts = self.ticks.read_and_reset();
        log::debug!("Remote: {:?} pulse counted {:?}", direction, counts);
        Ok(counts)
    }
}
