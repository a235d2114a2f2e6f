use core::{fmt, time::Duration};
use std::time::{SystemTime, UNIX_EPOCH};

/// The decoded form of a generated id.
///
/// An `Id` is a pure projection of the packed integer under one
/// [`BitLayout`] and epoch/tick-duration pairing. Decoding with a different
/// configuration than the one used to mint the id yields meaningless values;
/// matching the configuration is the caller's responsibility.
///
/// [`BitLayout`]: crate::BitLayout
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    tick: i64,
    generator_id: u32,
    sequence_number: u32,
    timestamp: Duration,
}

impl Id {
    pub(crate) const fn new(
        tick: i64,
        generator_id: u32,
        sequence_number: u32,
        timestamp: Duration,
    ) -> Self {
        Self {
            tick,
            generator_id,
            sequence_number,
            timestamp,
        }
    }

    /// The per-tick sequence number (0-based).
    pub const fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// The generator that minted the id.
    pub const fn generator_id(&self) -> u32 {
        self.generator_id
    }

    /// The raw tick stored in the timestamp field.
    pub const fn tick(&self) -> i64 {
        self.tick
    }

    /// The absolute time of the tick (`epoch + tick * tick_duration`) as a
    /// [`Duration`] since the UNIX epoch. Saturates at [`Duration::MAX`].
    pub const fn timestamp(&self) -> Duration {
        self.timestamp
    }

    /// The absolute time of the tick as a [`SystemTime`], if the platform can
    /// represent it.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(self.timestamp)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick={} generator={} sequence={}",
            self.tick, self.generator_id, self.sequence_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_fields_and_converts_to_system_time() {
        let id = Id::new(1, 5, 2, Duration::from_millis(1_420_070_400_001));
        assert_eq!(id.to_string(), "tick=1 generator=5 sequence=2");
        assert_eq!(
            id.to_system_time(),
            Some(UNIX_EPOCH + Duration::from_millis(1_420_070_400_001))
        );
        assert_eq!(Id::new(0, 0, 0, Duration::MAX).to_system_time(), None);
    }

    #[test]
    fn orders_by_tick_first() {
        let earlier = Id::new(1, 9, 9, Duration::ZERO);
        let later = Id::new(2, 0, 0, Duration::ZERO);
        assert!(earlier < later);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_a_struct() {
        let id = Id::new(1, 5, 2, Duration::from_secs(3));
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tick": 1,
                "generator_id": 5,
                "sequence_number": 2,
                "timestamp": { "secs": 3, "nanos": 0 },
            })
        );
        assert_eq!(serde_json::from_value::<Id>(json).unwrap(), id);
    }
}
