//! Configuration for Marga
//!
//! Loads configuration from a TOML file. Every field has a default matching
//! the calibrated prototype robot, so an empty file (or no file at all) yields
//! a working setup.
//!
//! Units: pose and travel distances are centimetres, headings are degrees
//! measured from the +Y axis, range-sensor estimates are millimetres.

use crate::error::{Error, Result};
use crate::navigation::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hardware backend selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Backend type (only "sim" is bundled)
    #[serde(rename = "type", default = "default_device_type")]
    pub device_type: String,

    /// Human readable name used in logs
    #[serde(default = "default_device_name")]
    pub name: String,
}

/// Remote command link (XBee serial bridge)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    /// Serial port path
    #[serde(default = "default_link_port")]
    pub port: String,

    /// Baud rate (8N1, no flow control)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Fixed calibration scalars of the robot and its range sensor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// Travel per encoder count (cm). 88 counts per wheel turn of 47.8 cm.
    #[serde(default = "default_distance_per_count")]
    pub distance_per_count: f64,

    /// In-place rotation per encoder count (degrees). 88 counts per 360°.
    #[serde(default = "default_degrees_per_count")]
    pub degrees_per_count: f64,

    /// Range estimate below which the path is considered blocked (mm)
    #[serde(default = "default_reference_distance")]
    pub reference_distance: f64,

    /// Extra range required before a deflection stops turning (mm)
    #[serde(default = "default_clearance_margin")]
    pub clearance_margin: f64,

    /// Range curve: `gain * scale / reading^exponent`
    #[serde(default = "default_curve_gain")]
    pub curve_gain: f64,

    #[serde(default = "default_curve_scale")]
    pub curve_scale: f64,

    #[serde(default = "default_curve_exponent")]
    pub curve_exponent: f64,

    /// ADC channel of the forward range sensor
    #[serde(default = "default_sensor_channel")]
    pub sensor_channel: u8,
}

/// Motion primitive and jog parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionConfig {
    /// PWM duty on both wheels for planned moves. Lower speed keeps the
    /// return path error small.
    #[serde(default = "default_traverse_speed")]
    pub traverse_speed: u8,

    /// PWM duty on both wheels for jog pulses
    #[serde(default = "default_jog_speed")]
    pub jog_speed: u8,

    /// Forward/back jog pulse length (ms)
    #[serde(default = "default_jog_linear_ms")]
    pub jog_linear_ms: u64,

    /// Left/right jog pulse length (ms)
    #[serde(default = "default_jog_turn_ms")]
    pub jog_turn_ms: u64,

    /// Wait after stopping a jog before reading the encoders (ms)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Empirical gain applied to jog turn angles
    #[serde(default = "default_jog_turn_gain")]
    pub jog_turn_gain: f64,

    /// Left turn per deflection clearing step (degrees)
    #[serde(default = "default_deflection_step_degrees")]
    pub deflection_step_degrees: f64,

    /// Compensation advance: `base / cos(step * turns) + offset` (cm)
    #[serde(default = "default_compensation_base")]
    pub compensation_base: f64,

    #[serde(default = "default_compensation_offset")]
    pub compensation_offset: f64,

    /// Delay between two polls of a running primitive (ms)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Abort a primitive when the encoders do not change for this long.
    /// Unset means block until they do.
    #[serde(default)]
    pub stall_timeout_ms: Option<u64>,

    /// Goal of the return command and of replans outside `navigate_to` (cm)
    #[serde(default = "default_home")]
    pub home: [f64; 2],
}

/// Circular obstacle in the simulated world
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObstacleConfig {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Simulator backend parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Start pose (cm, cm, degrees from +Y)
    #[serde(default)]
    pub start_x: f64,
    #[serde(default)]
    pub start_y: f64,
    #[serde(default)]
    pub start_heading: f64,

    /// Encoder tick rate of one wheel at full PWM duty
    #[serde(default = "default_max_ticks_per_sec")]
    pub max_ticks_per_sec: f64,

    /// Multiplicative wheel slip noise (stddev, 0 = exact)
    #[serde(default)]
    pub slip_stddev: f64,

    /// Noise seed (0 = random each run)
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    /// Beyond this distance the sensor sees nothing (cm)
    #[serde(default = "default_sensor_range")]
    pub sensor_range: f64,

    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_device_type() -> String {
    "sim".to_string()
}
fn default_device_name() -> String {
    "Prototype 4 (simulated)".to_string()
}
fn default_link_port() -> String {
    "/dev/ttyUSB0".to_string()
}
fn default_baud_rate() -> u32 {
    9600
}
fn default_distance_per_count() -> f64 {
    0.54
}
fn default_degrees_per_count() -> f64 {
    4.090
}
fn default_reference_distance() -> f64 {
    100.0
}
fn default_clearance_margin() -> f64 {
    30.0
}
fn default_curve_gain() -> f64 {
    10.0
}
fn default_curve_scale() -> f64 {
    2799.6
}
fn default_curve_exponent() -> f64 {
    1.1546
}
fn default_sensor_channel() -> u8 {
    11
}
fn default_traverse_speed() -> u8 {
    100
}
fn default_jog_speed() -> u8 {
    255
}
fn default_jog_linear_ms() -> u64 {
    80
}
fn default_jog_turn_ms() -> u64 {
    50
}
fn default_settle_ms() -> u64 {
    10
}
fn default_jog_turn_gain() -> f64 {
    3.0
}
fn default_deflection_step_degrees() -> f64 {
    25.0
}
fn default_compensation_base() -> f64 {
    10.0
}
fn default_compensation_offset() -> f64 {
    5.0
}
fn default_poll_interval_ms() -> u64 {
    1
}
fn default_home() -> [f64; 2] {
    [0.0, 0.0]
}
fn default_max_ticks_per_sec() -> f64 {
    60.0
}
fn default_random_seed() -> u64 {
    42
}
fn default_sensor_range() -> f64 {
    80.0
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            name: default_device_name(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: default_link_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            distance_per_count: default_distance_per_count(),
            degrees_per_count: default_degrees_per_count(),
            reference_distance: default_reference_distance(),
            clearance_margin: default_clearance_margin(),
            curve_gain: default_curve_gain(),
            curve_scale: default_curve_scale(),
            curve_exponent: default_curve_exponent(),
            sensor_channel: default_sensor_channel(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            traverse_speed: default_traverse_speed(),
            jog_speed: default_jog_speed(),
            jog_linear_ms: default_jog_linear_ms(),
            jog_turn_ms: default_jog_turn_ms(),
            settle_ms: default_settle_ms(),
            jog_turn_gain: default_jog_turn_gain(),
            deflection_step_degrees: default_deflection_step_degrees(),
            compensation_base: default_compensation_base(),
            compensation_offset: default_compensation_offset(),
            poll_interval_ms: default_poll_interval_ms(),
            stall_timeout_ms: None,
            home: default_home(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            start_heading: 0.0,
            max_ticks_per_sec: default_max_ticks_per_sec(),
            slip_stddev: 0.0,
            random_seed: default_random_seed(),
            sensor_range: default_sensor_range(),
            obstacles: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CalibrationConfig {
    /// Range estimate a deflection must exceed before it stops turning
    pub fn clearance_distance(&self) -> f64 {
        self.reference_distance + self.clearance_margin
    }
}

impl MotionConfig {
    pub fn home_point(&self) -> Point {
        Point::new(self.home[0], self.home[1])
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stall_timeout(&self) -> Option<Duration> {
        self.stall_timeout_ms.map(Duration::from_millis)
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use marga::config::AppConfig;
    ///
    /// let config = AppConfig::load("marga.toml")?;
    /// # Ok::<(), marga::Error>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
