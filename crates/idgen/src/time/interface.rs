use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// A source of ticks: integer counts of a fixed wall-clock duration elapsed
/// since an epoch.
///
/// This abstraction allows you to plug in a real clock, a coarser or finer
/// tick (a tick is not necessarily one millisecond), or a mocked time source
/// in tests (see [`ManualClock`]).
///
/// Implementations must be cheap and non-blocking, since generators call
/// [`TimeSource::current_tick`] on every id. Ticks are expected to be
/// non-negative and non-decreasing; this is not enforced here; generators
/// detect violations and refuse to mint ids.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use idgen::{TimeSource, DEFAULT_EPOCH};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn epoch(&self) -> Duration {
///         DEFAULT_EPOCH
///     }
///     fn tick_duration(&self) -> Duration {
///         Duration::from_millis(1)
///     }
///     fn current_tick(&self) -> i64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_tick(), 1234);
/// ```
///
/// [`ManualClock`]: crate::ManualClock
pub trait TimeSource {
    /// The origin of tick zero, as a [`Duration`] since the UNIX epoch.
    fn epoch(&self) -> Duration;

    /// The wall-clock duration of one tick.
    fn tick_duration(&self) -> Duration;

    /// The number of ticks elapsed since [`TimeSource::epoch`].
    fn current_tick(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn epoch(&self) -> Duration {
        (**self).epoch()
    }

    fn tick_duration(&self) -> Duration {
        (**self).tick_duration()
    }

    fn current_tick(&self) -> i64 {
        (**self).current_tick()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn epoch(&self) -> Duration {
        (**self).epoch()
    }

    fn tick_duration(&self) -> Duration {
        (**self).tick_duration()
    }

    fn current_tick(&self) -> i64 {
        (**self).current_tick()
    }
}
