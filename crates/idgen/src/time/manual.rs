use core::time::Duration;

use portable_atomic::{AtomicI64, Ordering};

use crate::time::TimeSource;

/// A [`TimeSource`] whose tick only moves when told to.
///
/// Useful for deterministic tests: freeze the clock to exhaust a tick's
/// sequence space, advance it to roll over, or rewind it to provoke a clock
/// regression. All operations are atomic, so one clock can be shared (e.g.
/// behind an [`Arc`]) between a generator and the test driving it, across
/// threads.
///
/// Tick arithmetic wraps on overflow, mirroring a counter that rolls past
/// `i64::MAX`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use idgen::{IdGenerator, LockIdGenerator, ManualClock};
///
/// let clock = Arc::new(ManualClock::new(0));
/// let generator = LockIdGenerator::new(5, Arc::clone(&clock)).unwrap();
///
/// assert_eq!(generator.create_id(), 20_480);
/// assert_eq!(generator.create_id(), 20_481);
///
/// clock.advance(1);
/// assert_eq!(generator.create_id(), 4_214_784);
/// ```
///
/// [`Arc`]: std::sync::Arc
#[derive(Debug)]
pub struct ManualClock {
    tick: AtomicI64,
    epoch: Duration,
    tick_duration: Duration,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ManualClock {
    /// Creates a millisecond clock frozen at `tick`, counting from the UNIX
    /// epoch.
    pub fn new(tick: i64) -> Self {
        Self::with_epoch(tick, Duration::ZERO, Duration::from_millis(1))
    }

    /// Creates a clock frozen at `tick` with an explicit epoch and tick
    /// duration.
    pub fn with_epoch(tick: i64, epoch: Duration, tick_duration: Duration) -> Self {
        Self {
            tick: AtomicI64::new(tick),
            epoch,
            tick_duration,
        }
    }

    /// The current tick.
    pub fn tick(&self) -> i64 {
        self.tick.load(Ordering::Acquire)
    }

    /// Moves the clock to `tick`, forwards or backwards.
    pub fn set(&self, tick: i64) {
        self.tick.store(tick, Ordering::Release);
    }

    /// Moves the clock forward by `ticks` and returns the new tick.
    pub fn advance(&self, ticks: i64) -> i64 {
        self.tick
            .fetch_add(ticks, Ordering::AcqRel)
            .wrapping_add(ticks)
    }

    /// Moves the clock backward by `ticks` and returns the new tick.
    pub fn rewind(&self, ticks: i64) -> i64 {
        self.tick
            .fetch_sub(ticks, Ordering::AcqRel)
            .wrapping_sub(ticks)
    }
}

impl TimeSource for ManualClock {
    fn epoch(&self) -> Duration {
        self.epoch
    }

    fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    fn current_tick(&self) -> i64 {
        self.tick()
    }
}
