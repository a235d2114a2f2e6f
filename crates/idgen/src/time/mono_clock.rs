use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::{
    error::{ConfigurationError, Result},
    time::{DEFAULT_EPOCH, TimeSource},
};

const DEFAULT_TICK: Duration = Duration::from_millis(1);

/// A monotonic time source that returns elapsed time since construction,
/// offset from a user-defined epoch and divided into ticks.
///
/// This avoids wall-clock adjustments (e.g., NTP or daylight savings changes)
/// while still aligning timestamps to a fixed origin.
///
/// Internally, the clock captures `Instant::now()` at construction together
/// with the signed distance between the wall clock (`SystemTime::now()`) and
/// the epoch. Each reading adds the monotonic elapsed time to that offset, so
/// after construction the clock never goes backward, even if the system clock
/// is adjusted externally.
///
/// When the wall clock is earlier than the epoch, ticks are negative and
/// generators refuse to mint ids until the clock catches up.
///
/// Clones share the same origin and report identical ticks.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: Instant,
    // Wall-clock time since the epoch at `start`, in nanoseconds.
    epoch_offset: i128,
    epoch: Duration,
    tick_duration: Duration,
}

impl Default for MonotonicClock {
    /// Constructs a millisecond clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a clock counting ticks of `tick_duration` since `epoch`,
    /// specified as a [`Duration`] since the UNIX epoch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ZeroTickDuration`] if `tick_duration` is
    /// zero.
    ///
    /// # Example
    ///
    /// ```
    /// use core::time::Duration;
    /// use idgen::{MonotonicClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let clock = MonotonicClock::new(TWITTER_EPOCH, Duration::from_secs(1)).unwrap();
    /// assert!(clock.current_tick() > 0);
    /// assert!(MonotonicClock::new(TWITTER_EPOCH, Duration::ZERO).is_err());
    /// ```
    pub fn new(epoch: Duration, tick_duration: Duration) -> Result<Self> {
        if tick_duration.is_zero() {
            return Err(ConfigurationError::ZeroTickDuration.into());
        }
        Ok(Self::from_parts(epoch, tick_duration))
    }

    /// Constructs a millisecond clock using `epoch` as the origin (t = 0).
    pub fn with_epoch(epoch: Duration) -> Self {
        Self::from_parts(epoch, DEFAULT_TICK)
    }

    fn from_parts(epoch: Duration, tick_duration: Duration) -> Self {
        let start = Instant::now();
        // Any Duration fits an i128 of nanoseconds.
        let since_unix = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_nanos() as i128,
            Err(before) => -(before.duration().as_nanos() as i128),
        };
        Self {
            start,
            epoch_offset: since_unix - epoch.as_nanos() as i128,
            epoch,
            tick_duration,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn epoch(&self) -> Duration {
        self.epoch
    }

    fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Returns the number of whole ticks since the configured epoch, based on
    /// the elapsed monotonic time since construction.
    fn current_tick(&self) -> i64 {
        let now = self.epoch_offset + self.start.elapsed().as_nanos() as i128;
        let ticks = now.div_euclid(self.tick_duration.as_nanos() as i128);
        ticks.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigurationError, Error};

    fn now_since_unix() -> Duration {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap()
    }

    #[test]
    fn ticks_start_near_zero_at_epoch_and_never_decrease() {
        let clock = MonotonicClock::with_epoch(now_since_unix());
        let mut last = clock.current_tick();
        assert!((0..1_000).contains(&last), "unexpected start tick {last}");

        for _ in 0..10_000 {
            let tick = clock.current_tick();
            assert!(tick >= last);
            last = tick;
        }
    }

    #[test]
    fn clones_share_origin() {
        let clock = MonotonicClock::new(DEFAULT_EPOCH, Duration::from_secs(3600)).unwrap();
        let clone = clock.clone();
        assert_eq!(clock.epoch(), clone.epoch());
        assert!(clone.current_tick() - clock.current_tick() <= 1);
    }

    #[test]
    fn coarse_ticks_count_from_epoch() {
        let day = Duration::from_secs(86_400);
        let clock = MonotonicClock::new(DEFAULT_EPOCH, day).unwrap();
        let expected = ((now_since_unix() - DEFAULT_EPOCH).as_secs() / 86_400) as i64;
        assert!((clock.current_tick() - expected).abs() <= 1);
        assert_eq!(clock.tick_duration(), day);
    }

    #[test]
    fn future_epoch_yields_negative_ticks() {
        let future = now_since_unix() + Duration::from_secs(3600);
        let clock = MonotonicClock::new(future, Duration::from_secs(1)).unwrap();
        assert!(clock.current_tick() < 0);
    }

    #[test]
    fn zero_tick_duration_is_rejected() {
        assert_eq!(
            MonotonicClock::new(DEFAULT_EPOCH, Duration::ZERO).unwrap_err(),
            Error::Configuration(ConfigurationError::ZeroTickDuration)
        );
    }

    #[test]
    fn default_clock_uses_milliseconds_since_default_epoch() {
        let clock = MonotonicClock::default();
        assert_eq!(clock.epoch(), DEFAULT_EPOCH);
        assert_eq!(clock.tick_duration(), Duration::from_millis(1));
        assert!(clock.current_tick() > 0);
    }
}
