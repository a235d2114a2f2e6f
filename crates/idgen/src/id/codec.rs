use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    id::Id,
    layout::BitLayout,
    time::{TimeSource, saturating_mul_duration},
};

/// Splits `id` into its sequence number, generator id and absolute time.
///
/// This is a pure function: no shared state, no locking, safe to call from any
/// thread. It never panics; ids decoded with a layout or epoch other than the
/// one that minted them produce meaningless values, and time arithmetic
/// saturates instead of overflowing.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use idgen::{BitLayout, decode};
///
/// let id = decode(4_214_785, &BitLayout::DEFAULT, Duration::ZERO, Duration::from_millis(1));
/// assert_eq!(id.tick(), 1);
/// assert_eq!(id.generator_id(), 5);
/// assert_eq!(id.sequence_number(), 1);
/// assert_eq!(id.timestamp(), Duration::from_millis(1));
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "trace"))]
pub fn decode(id: i64, layout: &BitLayout, epoch: Duration, tick_duration: Duration) -> Id {
    let sequence_number = (id & i64::from(layout.sequence_mask())) as u32;
    let generator_id = ((id >> layout.generator_shift()) & i64::from(layout.generator_mask())) as u32;
    let tick = (id >> layout.timestamp_shift()) & layout.timestamp_mask();
    // `tick` is masked to at most 63 bits, so it is non-negative.
    let offset = saturating_mul_duration(tick_duration, tick as u64);
    Id::new(
        tick,
        generator_id,
        sequence_number,
        epoch.saturating_add(offset),
    )
}

/// [`decode`] using the epoch and tick duration of `time`.
pub fn decode_with<T>(id: i64, layout: &BitLayout, time: &T) -> Id
where
    T: TimeSource + ?Sized,
{
    decode(id, layout, time.epoch(), time.tick_duration())
}
