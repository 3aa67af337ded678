//! Wheel encoder tick store
//!
//! Shared between the encoder edge producers (interrupt context on hardware,
//! the simulator clock or plain threads on a host) and the foreground control
//! logic. Both 32-bit counters live in one `AtomicU64` (left in the low half,
//! right in the high half), so a snapshot of the pair and a snapshot-and-zero
//! are single atomic operations. A tick is never lost or counted twice across a
//! reset, and no lock is held while a maneuver runs.

use std::sync::atomic::{AtomicU64, Ordering};

const RIGHT_SHIFT: u32 = 32;
const HALF_MASK: u64 = 0xFFFF_FFFF;

/// Pair of encoder counts read at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSnapshot {
    pub left: u32,
    pub right: u32,
}

impl TickSnapshot {
    pub fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    /// Sum of both wheels
    #[inline]
    pub fn sum(&self) -> u64 {
        self.left as u64 + self.right as u64
    }

    /// Integer average of both wheels (rounds down)
    #[inline]
    pub fn average(&self) -> u64 {
        self.sum() / 2
    }

    fn unpack(packed: u64) -> Self {
        Self {
            left: (packed & HALF_MASK) as u32,
            right: (packed >> RIGHT_SHIFT) as u32,
        }
    }

    fn pack(&self) -> u64 {
        ((self.right as u64) << RIGHT_SHIFT) | self.left as u64
    }
}

/// Left/right encoder counters
///
/// Producers call [`increment_left`](Self::increment_left) and
/// [`increment_right`](Self::increment_right); the foreground reads with
/// [`snapshot`](Self::snapshot) while polling and
/// [`read_and_reset`](Self::read_and_reset) at segment boundaries.
#[derive(Debug, Default)]
pub struct EncoderTicks {
    packed: AtomicU64,
}

impl EncoderTicks {
    pub const fn new() -> Self {
        Self {
            packed: AtomicU64::new(0),
        }
    }

    /// One edge on the left wheel encoder
    #[inline]
    pub fn increment_left(&self) {
        self.add(1, 0);
    }

    /// One edge on the right wheel encoder
    #[inline]
    pub fn increment_right(&self) {
        self.add(0, 1);
    }

    /// Add several edges at once. Each half saturates at `u32::MAX` instead of
    /// carrying into its neighbour.
    pub fn add(&self, left: u32, right: u32) {
        if left == 0 && right == 0 {
            return;
        }
        // The closure never returns None, so fetch_update cannot fail.
        let _ = self
            .packed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                let current = TickSnapshot::unpack(packed);
                let next = TickSnapshot {
                    left: current.left.saturating_add(left),
                    right: current.right.saturating_add(right),
                };
                Some(next.pack())
            });
    }

    /// Read both counters without clearing them
    #[inline]
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot::unpack(self.packed.load(Ordering::Acquire))
    }

    /// Atomically read both counters and zero them
    #[inline]
    pub fn read_and_reset(&self) -> TickSnapshot {
        TickSnapshot::unpack(self.packed.swap(0, Ordering::AcqRel))
    }

    /// Zero both counters, discarding their values
    #[inline]
    pub fn reset(&self) {
        self.packed.store(0, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_snapshot() {
        let ticks = EncoderTicks::new();
        ticks.increment_left();
        ticks.increment_left();
        ticks.increment_right();

        let snap = ticks.snapshot();
        assert_eq!(snap, TickSnapshot::new(2, 1));
        assert_eq!(snap.sum(), 3);
        assert_eq!(snap.average(), 1);

        // Snapshot does not clear
        assert_eq!(ticks.snapshot(), snap);
    }

    #[test]
    fn test_read_and_reset() {
        let ticks = EncoderTicks::new();
        ticks.add(10, 12);

        assert_eq!(ticks.read_and_reset(), TickSnapshot::new(10, 12));
        assert_eq!(ticks.snapshot(), TickSnapshot::default());

        ticks.increment_right();
        assert_eq!(ticks.read_and_reset(), TickSnapshot::new(0, 1));
    }

    #[test]
    fn test_halves_saturate_independently() {
        let ticks = EncoderTicks::new();
        ticks.add(u32::MAX - 1, 5);
        ticks.add(10, 0);

        let snap = ticks.snapshot();
        assert_eq!(snap.left, u32::MAX);
        assert_eq!(snap.right, 5);
    }

    #[test]
    fn test_reset() {
        let ticks = EncoderTicks::new();
        ticks.add(3, 4);
        ticks.reset();
        assert_eq!(ticks.snapshot(), TickSnapshot::default());
    }
}
