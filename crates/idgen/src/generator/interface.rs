use crate::{BitLayout, Id, Ids, Result};

/// A source of unique, roughly time-ordered 63-bit ids.
///
/// Implemented by [`LockIdGenerator`] and [`AtomicIdGenerator`]. Both are
/// `Sync` whenever their time source is, so one instance can be shared
/// between threads behind a reference or an [`Arc`].
///
/// [`LockIdGenerator`]: crate::LockIdGenerator
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
/// [`Arc`]: std::sync::Arc
pub trait IdGenerator {
    /// Mints the next id.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSystemClock`] if the time source went backwards, is
    ///   negative, or the timestamp field wrapped around.
    /// - [`Error::SequenceOverflow`] if the current tick is exhausted under
    ///   [`OverflowStrategy::Throw`].
    /// - [`Error::LockPoisoned`] if a lock-based generator's mutex was
    ///   poisoned (std mutex only).
    ///
    /// On error the generator state is unchanged.
    ///
    /// [`Error::InvalidSystemClock`]: crate::Error::InvalidSystemClock
    /// [`Error::SequenceOverflow`]: crate::Error::SequenceOverflow
    /// [`Error::LockPoisoned`]: crate::Error#variant.LockPoisoned
    /// [`OverflowStrategy::Throw`]: crate::OverflowStrategy::Throw
    fn try_create_id(&self) -> Result<i64>;

    /// Mints the next id, panicking where [`IdGenerator::try_create_id`]
    /// would fail.
    ///
    /// # Panics
    ///
    /// On any error [`IdGenerator::try_create_id`] documents.
    #[track_caller]
    fn create_id(&self) -> i64 {
        match self.try_create_id() {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Splits an id into its fields using this generator's layout and time
    /// source.
    fn decode(&self, id: i64) -> Id;

    /// The generator id embedded in every id this generator mints.
    fn generator_id(&self) -> u32;

    /// The bit layout ids are composed with.
    fn layout(&self) -> BitLayout;

    /// An endless iterator of [`IdGenerator::try_create_id`] results.
    fn ids(&self) -> Ids<'_, Self>
    where
        Self: Sized,
    {
        Ids::new(self)
    }
}
