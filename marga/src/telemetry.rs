//! Pose reporting on the character display
//!
//! The panel has no minus glyph, so signed values are written as an explicit
//! `+`/`-` followed by the zero-padded magnitude.
//!
//! ```text
//!  col 1          col 11
//! [+hhhh     +xxxx ]   heading, x
//! [ddddd     +yyyy ]   distance of current segment, y
//! ```

use crate::drivers::Display;
use crate::error::Result;
use crate::odometry::Pose;
use std::fmt;

const HEADING_AT: (u8, u8) = (1, 1);
const X_AT: (u8, u8) = (1, 11);
const DISTANCE_AT: (u8, u8) = (2, 1);
const Y_AT: (u8, u8) = (2, 11);

const SIGNED_DIGITS: usize = 4;
const DISTANCE_DIGITS: usize = 5;

/// Whole magnitude truncated to its lowest `digits` decimal digits
fn magnitude(value: f64, digits: usize) -> u64 {
    let modulus = 10u64.saturating_pow(digits as u32);
    (value.abs().trunc() as u64) % modulus
}

/// Signed value rendered as sign character plus fixed-width magnitude
#[derive(Debug, Clone, Copy)]
pub struct SignedField {
    pub value: f64,
    pub digits: usize,
}

impl SignedField {
    pub fn new(value: f64, digits: usize) -> Self {
        Self { value, digits }
    }
}

impl fmt::Display for SignedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value < 0.0 { '-' } else { '+' };
        write!(
            f,
            "{}{:0width$}",
            sign,
            magnitude(self.value, self.digits),
            width = self.digits
        )
    }
}

/// Writes pose fields at their fixed panel positions
#[derive(Debug, Clone, Copy, Default)]
pub struct Telemetry;

impl Telemetry {
    pub fn heading(&self, display: &mut dyn Display, heading: f64) -> Result<()> {
        let text = SignedField::new(heading, SIGNED_DIGITS).to_string();
        display.print_at(HEADING_AT.0, HEADING_AT.1, &text)
    }

    pub fn position(&self, display: &mut dyn Display, pose: &Pose) -> Result<()> {
        let x = SignedField::new(pose.x, SIGNED_DIGITS).to_string();
        let y = SignedField::new(pose.y, SIGNED_DIGITS).to_string();
        display.print_at(X_AT.0, X_AT.1, &x)?;
        display.print_at(Y_AT.0, Y_AT.1, &y)
    }

    pub fn distance(&self, display: &mut dyn Display, distance: f64) -> Result<()> {
        let text = format!(
            "{:0width$}",
            magnitude(distance, DISTANCE_DIGITS),
            width = DISTANCE_DIGITS
        );
        display.print_at(DISTANCE_AT.0, DISTANCE_AT.1, &text)
    }
}
