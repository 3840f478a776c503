/*!
 * Monotonic Clock
 * Tick sources and millisecond <-> tick conversion
 */

use super::limits::TICK_HZ;
use super::types::Tick;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of the current tick
pub trait Clock {
    fn now(&self) -> Tick;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    #[inline]
    fn now(&self) -> Tick {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    #[inline]
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// Ticks elapsed since construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Tick {
        let micros = self.origin.elapsed().as_micros();
        (micros * TICK_HZ as u128 / 1_000_000).min(Tick::MAX as u128) as Tick
    }
}

/// Externally driven clock; clones share the same counter
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ticks: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ticks: Tick) -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(ticks)),
        }
    }

    pub fn set(&self, ticks: Tick) {
        self.ticks.store(ticks, Ordering::Relaxed);
    }

    pub fn advance(&self, ticks: Tick) {
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }

    /// Advance by a wall-clock amount, rounded up to whole ticks
    pub fn advance_ms(&self, ms: u64) {
        self.advance(msecs_to_ticks(ms));
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Tick {
        self.ticks.load(Ordering::Relaxed)
    }
}

/// Milliseconds to ticks, rounding up
#[inline]
pub const fn msecs_to_ticks(ms: u64) -> Tick {
    let scaled = ms as u128 * TICK_HZ as u128;
    let ticks = (scaled + 999) / 1000;
    if ticks > Tick::MAX as u128 {
        Tick::MAX
    } else {
        ticks as Tick
    }
}

/// Ticks to milliseconds, truncating
#[inline]
pub const fn ticks_to_msecs(ticks: Tick) -> u64 {
    let ms = ticks as u128 * 1000 / TICK_HZ as u128;
    if ms > u64::MAX as u128 {
        u64::MAX
    } else {
        ms as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msecs_round_up() {
        assert_eq!(msecs_to_ticks(0), 0);
        assert_eq!(msecs_to_ticks(1), 1);
        assert_eq!(msecs_to_ticks(4), 1);
        assert_eq!(msecs_to_ticks(5), 2);
        assert_eq!(msecs_to_ticks(500), 125);
        // 250 Hz scales down, so even u64::MAX ms fits in a tick count
        assert_eq!(msecs_to_ticks(u64::MAX), u64::MAX.div_ceil(4));
    }

    #[test]
    fn test_ticks_truncate() {
        assert_eq!(ticks_to_msecs(125), 500);
        assert_eq!(ticks_to_msecs(1), 4);
        assert_eq!(ticks_to_msecs(msecs_to_ticks(10)), 12);
        assert_eq!(ticks_to_msecs(Tick::MAX), u64::MAX);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::starting_at(10);
        let other = clock.clone();
        other.advance(5);
        assert_eq!(clock.now(), 15);
        clock.advance_ms(8);
        assert_eq!(other.now(), 17);
    }

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
