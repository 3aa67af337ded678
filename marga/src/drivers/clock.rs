//! Time source for the poll loops and jog pulses

use std::time::Duration;

/// Monotonic clock with a blocking delay.
///
/// `delay` is the suspension point of every motion: encoder edges keep
/// arriving while it runs, and counters are only read after it returns.
pub trait Clock: Send {
    /// Block for `duration`
    fn delay(&mut self, duration: Duration);

    /// Time since the clock was created
    fn elapsed(&self) -> Duration;
}
