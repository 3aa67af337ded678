//! Encoder stall detection for the poll loops

use crate::encoder::TickSnapshot;
use crate::error::{Error, Result};
use std::time::Duration;

/// Tracks the last time the counters changed during one primitive
#[derive(Debug, Clone, Copy)]
pub struct StallWatch {
    timeout: Option<Duration>,
    last_counts: TickSnapshot,
    last_change: Duration,
}

impl StallWatch {
    /// Start watching at clock time `now`. `None` never reports a stall.
    pub fn new(timeout: Option<Duration>, now: Duration) -> Self {
        Self {
            timeout,
            last_counts: TickSnapshot::default(),
            last_change: now,
        }
    }

    /// Record a poll; fails once the counters have been still for the timeout
    pub fn check(&mut self, counts: TickSnapshot, now: Duration) -> Result<()> {
        if counts != self.last_counts {
            self.last_counts = counts;
            self.last_change = now;
            return Ok(());
        }

        if let Some(timeout) = self.timeout {
            let waited = now.saturating_sub(self.last_change);
            if waited >= timeout {
                return Err(Error::EncoderStall {
                    waited_ms: waited.as_millis() as u64,
                    left: counts.left,
                    right: counts.right,
                });
            }
        }
        Ok(())
    }
}
