//! Range sensor driver trait

use crate::error::Result;

/// ADC-backed proximity sensor bank
pub trait RangeSensor: Send {
    /// Sample one channel (8-bit, larger means closer)
    fn read(&mut self, channel: u8) -> Result<u8>;
}
