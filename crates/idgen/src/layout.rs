use core::{fmt, time::Duration};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::{ConfigurationError, Error, Result},
    time::checked_mul_duration,
};

/// Number of bits available to a layout. The sign bit of an `i64` is never
/// used, so every id is non-negative.
pub const TOTAL_BITS: u8 = 63;

/// Maximum width of the generator and sequence fields.
pub const MAX_FIELD_BITS: u8 = 31;

/// Describes how the 63 usable bits of an id are split between the
/// timestamp, generator id and sequence fields.
///
/// ```text
///  Bit Index:  63           63 62                 G+S  G+S-1            S  S-1            0
///              +--------------+---------------------+------------------+-----------------+
///  Field:      | reserved (1) | timestamp (T bits)  | generator (G)    | sequence (S)    |
///              +--------------+---------------------+------------------+-----------------+
///              |<----------- MSB --------------- 64 bits --------------- LSB ----------->|
/// ```
///
/// A layout is validated once on construction and is immutable afterwards.
/// It is `Copy`, so any number of generators and decoders can hold their own
/// copy.
///
/// # Example
///
/// ```
/// use idgen::BitLayout;
///
/// let layout = BitLayout::new(41, 10, 12).unwrap();
/// assert_eq!(layout, BitLayout::DEFAULT);
/// assert_eq!(layout.max_generators(), 1024);
/// assert_eq!(layout.max_sequence(), 4096);
/// assert!(BitLayout::new(41, 10, 11).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitLayout {
    timestamp_bits: u8,
    generator_bits: u8,
    sequence_bits: u8,
}

impl Default for BitLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitLayout {
    /// The classic 41/10/12 split: about 69 years of millisecond ticks, 1024
    /// generators and 4096 ids per generator per tick.
    pub const DEFAULT: Self = Self {
        timestamp_bits: 41,
        generator_bits: 10,
        sequence_bits: 12,
    };

    /// Creates a new layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the widths do not add up to 63
    /// bits, or when the generator or sequence field is wider than 31 bits.
    pub fn new(timestamp_bits: u8, generator_bits: u8, sequence_bits: u8) -> Result<Self> {
        let total = u16::from(timestamp_bits) + u16::from(generator_bits) + u16::from(sequence_bits);
        if total != u16::from(TOTAL_BITS) {
            return Err(ConfigurationError::TotalBits { total }.into());
        }
        if generator_bits > MAX_FIELD_BITS {
            return Err(ConfigurationError::GeneratorBits {
                bits: generator_bits,
            }
            .into());
        }
        if sequence_bits > MAX_FIELD_BITS {
            return Err(ConfigurationError::SequenceBits {
                bits: sequence_bits,
            }
            .into());
        }
        Ok(Self {
            timestamp_bits,
            generator_bits,
            sequence_bits,
        })
    }

    /// Width of the timestamp field.
    pub const fn timestamp_bits(&self) -> u8 {
        self.timestamp_bits
    }

    /// Width of the generator id field.
    pub const fn generator_bits(&self) -> u8 {
        self.generator_bits
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    /// Number of distinct ticks the timestamp field can hold (exclusive upper
    /// bound).
    pub const fn max_intervals(&self) -> u64 {
        1 << self.timestamp_bits
    }

    /// Number of distinct generator ids (exclusive upper bound).
    pub const fn max_generators(&self) -> u32 {
        1 << self.generator_bits
    }

    /// Number of ids a single generator can mint per tick (exclusive upper
    /// bound on the sequence).
    pub const fn max_sequence(&self) -> u32 {
        1 << self.sequence_bits
    }

    /// Bitmask for the (unshifted) timestamp field.
    pub const fn timestamp_mask(&self) -> i64 {
        mask(self.timestamp_bits) as i64
    }

    /// Bitmask for the (unshifted) generator id field.
    pub const fn generator_mask(&self) -> u32 {
        mask(self.generator_bits) as u32
    }

    /// Bitmask for the sequence field.
    pub const fn sequence_mask(&self) -> u32 {
        mask(self.sequence_bits) as u32
    }

    /// Position of the lowest timestamp bit.
    pub const fn timestamp_shift(&self) -> u32 {
        self.generator_bits as u32 + self.sequence_bits as u32
    }

    /// Position of the lowest generator id bit.
    pub const fn generator_shift(&self) -> u32 {
        self.sequence_bits as u32
    }

    /// Packs the three fields into an id.
    ///
    /// Each field must already fit its width; callers are the generators,
    /// which validate the generator id at construction and mask the tick.
    pub(crate) fn compose(&self, tick: i64, generator_id: u32, sequence: u32) -> i64 {
        debug_assert!(
            (0..=self.timestamp_mask()).contains(&tick),
            "timestamp overflow"
        );
        debug_assert!(generator_id <= self.generator_mask(), "generator_id overflow");
        debug_assert!(sequence <= self.sequence_mask(), "sequence overflow");
        (tick << self.timestamp_shift())
            | (i64::from(generator_id) << self.generator_shift())
            | i64::from(sequence)
    }

    /// Wall-clock span after which the timestamp field wraps around, i.e.
    /// `tick_duration * max_intervals`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArithmeticOverflow`] if the span does not fit a
    /// [`Duration`].
    pub fn wraparound_interval(&self, tick_duration: Duration) -> Result<Duration> {
        checked_mul_duration(tick_duration, self.max_intervals()).ok_or(Error::ArithmeticOverflow)
    }

    /// The instant at which the timestamp field wraps around for ids counted
    /// from `epoch` (a [`Duration`] since the UNIX epoch).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArithmeticOverflow`] if the interval or the resulting
    /// date cannot be represented.
    pub fn wraparound_date(&self, epoch: Duration, tick_duration: Duration) -> Result<SystemTime> {
        let interval = self.wraparound_interval(tick_duration)?;
        UNIX_EPOCH
            .checked_add(epoch)
            .and_then(|origin| origin.checked_add(interval))
            .ok_or(Error::ArithmeticOverflow)
    }
}

impl fmt::Display for BitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.timestamp_bits, self.generator_bits, self.sequence_bits
        )
    }
}

const fn mask(bits: u8) -> u64 {
    (1 << bits) - 1
}
