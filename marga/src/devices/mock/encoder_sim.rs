//! Wheel encoder simulation
//!
//! Each wheel turns at `max_ticks_per_sec · duty / 255` counts per second.
//! Encoder edges are produced from that rate with optional multiplicative
//! slip, carrying the fractional part between steps.

use super::noise::NoiseGenerator;

/// Encoder pair of the differential drive
pub struct EncoderSimulator {
    max_ticks_per_sec: f64,
    slip_stddev: f64,
    noise: NoiseGenerator,
    left_accumulator: f64,
    right_accumulator: f64,
}

impl EncoderSimulator {
    pub fn new(max_ticks_per_sec: f64, slip_stddev: f64, noise: NoiseGenerator) -> Self {
        Self {
            max_ticks_per_sec,
            slip_stddev,
            noise,
            left_accumulator: 0.0,
            right_accumulator: 0.0,
        }
    }

    /// Wheel rotation rate at a PWM duty (counts per second)
    pub fn rate(&self, duty: u8) -> f64 {
        self.max_ticks_per_sec * duty as f64 / 255.0
    }

    /// Mean rotation of both wheels over `dt` seconds, free of slip (counts)
    pub fn travel(&self, left_duty: u8, right_duty: u8, dt: f64) -> f64 {
        (self.rate(left_duty) + self.rate(right_duty)) / 2.0 * dt
    }

    /// Advance both wheels by `dt` seconds and return the edges produced
    pub fn update(&mut self, left_duty: u8, right_duty: u8, dt: f64) -> (u32, u32) {
        let left_slip = 1.0 + self.noise.gaussian(self.slip_stddev);
        let right_slip = 1.0 + self.noise.gaussian(self.slip_stddev);

        self.left_accumulator += (self.rate(left_duty) * dt * left_slip).max(0.0);
        self.right_accumulator += (self.rate(right_duty) * dt * right_slip).max(0.0);

        let left_whole = self.left_accumulator.trunc();
        let right_whole = self.right_accumulator.trunc();
        self.left_accumulator -= left_whole;
        self.right_accumulator -= right_whole;

        (left_whole as u32, right_whole as u32)
    }
}
