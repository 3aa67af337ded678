//! Simulated robot for hardware-free runs and tests
//!
//! One shared state backs every collaborator the navigator needs:
//!
//! | Trait | Simulation |
//! |-------|------------|
//! | [`MotorDriver`] | Records commands, drives the wheel model |
//! | [`RangeSensor`] | Scripted readings, else a ray cast inverted through the range curve |
//! | [`Display`] | 2x16 frame buffer |
//! | [`Clock`] | Virtual time; `delay` advances the world in 1 ms steps |
//!
//! Time only moves inside `Clock::delay`, and encoder edges are pushed into
//! the shared [`EncoderTicks`] during those steps, the same way interrupts
//! fire while the firmware waits. Simulations are therefore deterministic
//! and run as fast as the host allows.
//!
//! The wheels start at full duty: with the PWM timer left unconfigured the
//! enable pins sit high until a velocity is set.

pub mod encoder_sim;
mod noise;
pub mod world;

use crate::config::{CalibrationConfig, SimulationConfig};
use crate::drivers::{Clock, Direction, Display, Hardware, MotorDriver, RangeSensor, TextPanel};
use crate::encoder::EncoderTicks;
use crate::error::{Error, Result};
use crate::odometry::{Odometry, Pose};
use crate::ranging::RangeCurve;

use encoder_sim::EncoderSimulator;
use noise::NoiseGenerator;
use world::World;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Granularity of simulated time
pub const SIM_STEP: Duration = Duration::from_millis(1);

const MM_PER_CM: f64 = 10.0;

/// Motor command as received by the simulated driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    Direction(Direction),
    Velocity { left: u8, right: u8 },
}

struct SimState {
    ticks: Arc<EncoderTicks>,
    encoder: EncoderSimulator,
    world: World,
    odometry: Odometry,
    curve: RangeCurve,
    sensor_channel: u8,
    sensor_range: f64,

    pose: Pose,
    direction: Direction,
    duty: (u8, u8),
    now: Duration,
    wheels_blocked: bool,

    script: VecDeque<u8>,
    commands: Vec<MotorCommand>,
    panel: TextPanel,
    sensor_reads: usize,
}

impl SimState {
    fn advance(&mut self, duration: Duration) {
        let mut remaining = if duration.is_zero() {
            SIM_STEP
        } else {
            duration
        };
        while !remaining.is_zero() {
            let dt = remaining.min(SIM_STEP);
            self.step(dt);
            remaining -= dt;
        }
    }

    fn step(&mut self, dt: Duration) {
        self.now += dt;
        if self.wheels_blocked || self.direction == Direction::Stop {
            return;
        }

        let seconds = dt.as_secs_f64();
        let (left, right) = self.encoder.update(self.duty.0, self.duty.1, seconds);
        self.ticks.add(left, right);

        let counts = self.encoder.travel(self.duty.0, self.duty.1, seconds);
        let distance = self.odometry.distance_per_count * counts;
        let angle = self.odometry.degrees_per_count * counts;
        match self.direction {
            Direction::Forward => self.translate(distance),
            Direction::Backward => self.translate(-distance),
            Direction::Left => self.pose.heading -= angle,
            Direction::Right => self.pose.heading += angle,
            Direction::Stop => {}
        }
    }

    fn translate(&mut self, distance: f64) {
        let theta = self.pose.heading.to_radians();
        self.pose.x += distance * theta.sin();
        self.pose.y += distance * theta.cos();
    }

    fn read_sensor(&mut self, channel: u8) -> Result<u8> {
        self.sensor_reads += 1;
        if channel != self.sensor_channel {
            return Err(Error::Device(format!(
                "no range sensor on ADC channel {}",
                channel
            )));
        }
        if let Some(reading) = self.script.pop_front() {
            return Ok(reading);
        }
        let distance = self
            .world
            .ray_cast(&self.pose, self.sensor_range)
            .unwrap_or(self.sensor_range);
        Ok(self.curve.reading_for(distance * MM_PER_CM))
    }
}

/// Cloneable handle to a simulated robot.
///
/// Every clone shares the same state, so tests keep one handle for
/// inspection while the navigator owns the boxed collaborators.
#[derive(Clone)]
pub struct SimulatedRobot {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedRobot {
    pub fn new(
        config: &SimulationConfig,
        calibration: &CalibrationConfig,
        ticks: Arc<EncoderTicks>,
    ) -> Self {
        let noise = NoiseGenerator::new(config.random_seed);
        log::info!(
            "SimulatedRobot: start ({:.1}, {:.1}) heading {:.1}°, {} obstacles",
            config.start_x,
            config.start_y,
            config.start_heading,
            config.obstacles.len()
        );

        let state = SimState {
            ticks,
            encoder: EncoderSimulator::new(config.max_ticks_per_sec, config.slip_stddev, noise),
            world: World::from_config(&config.obstacles),
            odometry: Odometry::from_config(calibration),
            curve: RangeCurve::from_config(calibration),
            sensor_channel: calibration.sensor_channel,
            sensor_range: config.sensor_range,
            pose: Pose::new(config.start_x, config.start_y, config.start_heading),
            direction: Direction::Stop,
            duty: (u8::MAX, u8::MAX),
            now: Duration::ZERO,
            wheels_blocked: false,
            script: VecDeque::new(),
            commands: Vec::new(),
            panel: TextPanel::new(),
            sensor_reads: 0,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Boxed collaborators for a navigator, all backed by this robot
    pub fn hardware(&self) -> Hardware {
        Hardware {
            motors: Box::new(self.clone()),
            sensor: Box::new(self.clone()),
            display: Box::new(self.clone()),
            clock: Box::new(self.clone()),
        }
    }

    /// Ground-truth pose of the simulated body
    pub fn true_pose(&self) -> Pose {
        self.state.lock().pose
    }

    /// Simulated time since creation
    pub fn sim_time(&self) -> Duration {
        self.state.lock().now
    }

    /// Serve these raw readings before falling back to the world model
    pub fn script_readings<I: IntoIterator<Item = u8>>(&self, readings: I) {
        self.state.lock().script.extend(readings);
    }

    pub fn pending_readings(&self) -> usize {
        self.state.lock().script.len()
    }

    /// Hold the wheels still regardless of motor commands
    pub fn block_wheels(&self, blocked: bool) {
        self.state.lock().wheels_blocked = blocked;
    }

    pub fn direction(&self) -> Direction {
        self.state.lock().direction
    }

    pub fn motor_commands(&self) -> Vec<MotorCommand> {
        self.state.lock().commands.clone()
    }

    /// Direction commands only, in order
    pub fn directions(&self) -> Vec<Direction> {
        self.state
            .lock()
            .commands
            .iter()
            .filter_map(|c| match c {
                MotorCommand::Direction(d) => Some(*d),
                MotorCommand::Velocity { .. } => None,
            })
            .collect()
    }

    pub fn display_row(&self, row: u8) -> String {
        self.state.lock().panel.row(row)
    }

    pub fn sensor_reads(&self) -> usize {
        self.state.lock().sensor_reads
    }
}

impl MotorDriver for SimulatedRobot {
    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let mut state = self.state.lock();
        state.direction = direction;
        state.commands.push(MotorCommand::Direction(direction));
        log::trace!("SimulatedRobot: direction {:?}", direction);
        Ok(())
    }

    fn set_velocity(&mut self, left: u8, right: u8) -> Result<()> {
        let mut state = self.state.lock();
        state.duty = (left, right);
        state.commands.push(MotorCommand::Velocity { left, right });
        Ok(())
    }
}

impl RangeSensor for SimulatedRobot {
    fn read(&mut self, channel: u8) -> Result<u8> {
        self.state.lock().read_sensor(channel)
    }
}

impl Display for SimulatedRobot {
    fn print_at(&mut self, row: u8, col: u8, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.panel.write(row, col, text);
        log::trace!("SimulatedRobot: display [{}]", state.panel.row(row));
        Ok(())
    }
}

impl Clock for SimulatedRobot {
    fn delay(&mut self, duration: Duration) {
        self.state.lock().advance(duration);
    }

    fn elapsed(&self) -> Duration {
        self.state.lock().now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObstacleConfig;
    use approx::assert_abs_diff_eq;

    fn robot(config: SimulationConfig) -> (SimulatedRobot, Arc<EncoderTicks>) {
        let ticks = Arc::new(EncoderTicks::new());
        let robot = SimulatedRobot::new(&config, &CalibrationConfig::default(), ticks.clone());
        (robot, ticks)
    }

    #[test]
    fn test_time_only_moves_in_delay() {
        let (mut robot, ticks) = robot(SimulationConfig::default());
        robot.set_direction(Direction::Forward).unwrap();
        assert_eq!(ticks.snapshot().sum(), 0);

        robot.delay(Duration::from_millis(1000));
        assert_eq!(robot.sim_time(), Duration::from_millis(1000));
        let counts = ticks.snapshot();
        // 60 counts per second per wheel at full duty
        assert!((59..=60).contains(&counts.left), "{:?}", counts);
        assert!(robot.true_pose().y > 30.0);
    }

    #[test]
    fn test_zero_delay_still_steps() {
        let (mut robot, _) = robot(SimulationConfig::default());
        robot.delay(Duration::ZERO);
        assert_eq!(robot.elapsed(), SIM_STEP);
    }

    #[test]
    fn test_turns_change_heading_only() {
        let (mut robot, _) = robot(SimulationConfig::default());
        robot.set_direction(Direction::Left).unwrap();
        robot.delay(Duration::from_millis(500));
        let pose = robot.true_pose();
        assert_abs_diff_eq!(pose.heading, -30.0 * 4.09, epsilon = 1e-6);
        assert_eq!((pose.x, pose.y), (0.0, 0.0));
    }

    #[test]
    fn test_blocked_wheels_produce_no_ticks() {
        let (mut robot, ticks) = robot(SimulationConfig::default());
        robot.block_wheels(true);
        robot.set_direction(Direction::Forward).unwrap();
        robot.delay(Duration::from_millis(200));
        assert_eq!(ticks.snapshot().sum(), 0);
        assert_eq!(robot.true_pose(), Pose::default());
    }

    #[test]
    fn test_script_then_world() {
        let config = SimulationConfig {
            obstacles: vec![ObstacleConfig {
                x: 0.0,
                y: 20.0,
                radius: 5.0,
            }],
            ..SimulationConfig::default()
        };
        let (mut robot, _) = robot(config);
        robot.script_readings([200, 7]);

        assert_eq!(robot.read(11).unwrap(), 200);
        assert_eq!(robot.read(11).unwrap(), 7);

        // Obstacle surface 15 cm ahead
        let curve = RangeCurve::default();
        let range = curve.convert(robot.read(11).unwrap()) as f64;
        assert!((range - 150.0).abs() < 15.0, "range={}", range);
        assert!(robot.read(3).is_err());
        assert_eq!(robot.sensor_reads(), 4);
    }

    #[test]
    fn test_records_commands_and_display() {
        let (mut robot, _) = robot(SimulationConfig::default());
        robot.set_velocity(100, 100).unwrap();
        robot.set_direction(Direction::Right).unwrap();
        robot.stop().unwrap();
        robot.print_at(1, 1, "+0045").unwrap();

        assert_eq!(
            robot.motor_commands(),
            vec![
                MotorCommand::Velocity {
                    left: 100,
                    right: 100
                },
                MotorCommand::Direction(Direction::Right),
                MotorCommand::Direction(Direction::Stop),
            ]
        );
        assert_eq!(robot.directions(), vec![Direction::Right, Direction::Stop]);
        assert!(robot.display_row(1).starts_with("+0045"));
    }
}
