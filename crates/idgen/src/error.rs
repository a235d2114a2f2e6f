use core::fmt;

/// A result type defaulting to the crate [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `idgen` can emit.
///
/// Every failure is local, synchronous and deterministic for a given clock and
/// generator state. Nothing is retried on the caller's behalf except the
/// explicit [`OverflowStrategy::SpinWait`] loop.
///
/// [`OverflowStrategy::SpinWait`]: crate::OverflowStrategy::SpinWait
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A bit layout, generator id or time source was rejected at construction.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The time source reported a tick earlier than the last one used, or the
    /// timestamp field wrapped around.
    ///
    /// The generator state is left untouched, so a later call re-evaluates the
    /// clock.
    #[error("{}", clock_message(.last_tick, .current_tick))]
    InvalidSystemClock {
        /// The tick of the most recently minted id.
        last_tick: i64,
        /// The offending tick, masked to the timestamp width unless it was
        /// negative.
        current_tick: i64,
    },

    /// The sequence space of the current tick is exhausted and the generator
    /// uses [`OverflowStrategy::Throw`].
    ///
    /// [`OverflowStrategy::Throw`]: crate::OverflowStrategy::Throw
    #[error("sequence overflow; refusing to generate ids for the rest of tick {tick}")]
    SequenceOverflow {
        /// The exhausted tick.
        tick: i64,
    },

    /// A wraparound interval or date does not fit the time types in use.
    #[error("arithmetic overflow while computing a wraparound interval or date")]
    ArithmeticOverflow,

    /// The generator lock was poisoned by a thread that panicked while holding
    /// it.
    ///
    /// Mutexes from `parking_lot` do not poison, so this variant is absent when
    /// the `parking-lot` feature is enabled.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Number of ticks the clock is behind the last minted id, for
    /// [`Error::InvalidSystemClock`].
    ///
    /// `None` for other variants and for a negative tick, which is rejected
    /// outright rather than measured against the last id.
    pub fn ticks_behind(&self) -> Option<i64> {
        match *self {
            Self::InvalidSystemClock {
                last_tick,
                current_tick,
            } => ticks_behind(last_tick, current_tick),
            _ => None,
        }
    }
}

fn ticks_behind(last_tick: i64, current_tick: i64) -> Option<i64> {
    (current_tick >= 0).then(|| last_tick.saturating_sub(current_tick))
}

fn clock_message(last_tick: &i64, current_tick: &i64) -> String {
    match ticks_behind(*last_tick, *current_tick) {
        Some(behind) => format!(
            "clock moved backwards or wrapped around; refusing to generate ids for {behind} ticks"
        ),
        None => format!("clock reported negative tick {current_tick}; refusing to generate ids"),
    }
}

/// Reasons a construction attempt was refused.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The three field widths do not add up to 63 bits.
    TotalBits {
        /// The actual sum of the widths.
        total: u16,
    },
    /// The generator field is wider than 31 bits.
    GeneratorBits {
        /// The requested width.
        bits: u8,
    },
    /// The sequence field is wider than 31 bits.
    SequenceBits {
        /// The requested width.
        bits: u8,
    },
    /// The generator id does not fit the generator field.
    GeneratorId {
        /// The requested generator id.
        generator_id: u32,
        /// Exclusive upper bound for the layout in use.
        max_generators: u32,
    },
    /// A time source was given a zero tick duration.
    ZeroTickDuration,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalBits { total } => write!(
                f,
                "number of bits used to generate ids is {total}, expected 63"
            ),
            Self::GeneratorBits { bits } => {
                write!(f, "generator id cannot have more than 31 bits (got {bits})")
            }
            Self::SequenceBits { bits } => {
                write!(f, "sequence cannot have more than 31 bits (got {bits})")
            }
            Self::GeneratorId {
                generator_id,
                max_generators,
            } => write!(
                f,
                "generator id {generator_id} must be between 0 and {} (inclusive)",
                max_generators - 1
            ),
            Self::ZeroTickDuration => f.write_str("tick duration must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigurationError {}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};

#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_error_reports_regression_magnitude() {
        let err = Error::InvalidSystemClock {
            last_tick: 100,
            current_tick: 97,
        };
        assert_eq!(err.ticks_behind(), Some(3));
        assert_eq!(
            err.to_string(),
            "clock moved backwards or wrapped around; refusing to generate ids for 3 ticks"
        );
        assert_eq!(Error::ArithmeticOverflow.ticks_behind(), None);
    }

    #[test]
    fn negative_tick_has_no_regression_magnitude() {
        let err = Error::InvalidSystemClock {
            last_tick: -1,
            current_tick: -5,
        };
        assert_eq!(err.ticks_behind(), None);
        assert_eq!(
            err.to_string(),
            "clock reported negative tick -5; refusing to generate ids"
        );
    }

    #[test]
    fn configuration_errors_render_their_bounds() {
        let err = Error::from(ConfigurationError::GeneratorId {
            generator_id: 1024,
            max_generators: 1024,
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration: generator id 1024 must be between 0 and 1023 (inclusive)"
        );
        assert_eq!(
            ConfigurationError::TotalBits { total: 62 }.to_string(),
            "number of bits used to generate ids is 62, expected 63"
        );
    }
}
