//! Range sensor adapter
//!
//! The forward IR proximity sensor reports an 8-bit ADC sample that falls as
//! the target moves away. The empirical calibration curve
//! `gain * scale / reading^exponent` turns it into a distance estimate in
//! millimetres, truncated to a whole number.

use crate::config::CalibrationConfig;

/// Inverse power-law calibration curve of the range sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCurve {
    pub gain: f64,
    pub scale: f64,
    pub exponent: f64,
}

impl RangeCurve {
    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self {
            gain: config.curve_gain,
            scale: config.curve_scale,
            exponent: config.curve_exponent,
        }
    }

    /// Convert a raw sample into a distance estimate.
    ///
    /// A zero sample (nothing in view) saturates to `u32::MAX`, i.e. "far".
    pub fn convert(&self, reading: u8) -> u32 {
        let estimate = self.gain * self.scale / (reading as f64).powf(self.exponent);
        // Float-to-int casts saturate, which maps +inf to u32::MAX.
        estimate.floor() as u32
    }

    /// Raw sample the sensor produces for a target at `distance`.
    ///
    /// Inverse of [`convert`](Self::convert), rounded and clamped to the ADC
    /// range. Used by the simulator.
    pub fn reading_for(&self, distance: f64) -> u8 {
        if distance <= 0.0 {
            return u8::MAX;
        }
        let reading = (self.gain * self.scale / distance).powf(1.0 / self.exponent);
        reading.round().clamp(1.0, u8::MAX as f64) as u8
    }
}

impl Default for RangeCurve {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }
}
