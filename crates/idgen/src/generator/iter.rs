use core::iter::FusedIterator;

use crate::{IdGenerator, Result};

/// Endless iterator over a generator's ids, created by [`IdGenerator::ids`].
///
/// Every item is a fresh [`IdGenerator::try_create_id`] call; errors are
/// yielded rather than ending the iteration.
///
/// ```
/// use std::sync::Arc;
/// use idgen::{IdGenerator, LockIdGenerator, ManualClock};
///
/// let generator = LockIdGenerator::new(0, Arc::new(ManualClock::new(0))).unwrap();
/// let ids: Vec<i64> = generator.ids().take(3).collect::<Result<_, _>>().unwrap();
/// assert_eq!(ids, [0, 1, 2]);
/// ```
#[derive(Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Ids<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: IdGenerator + ?Sized> Ids<'a, G> {
    pub(crate) fn new(generator: &'a G) -> Self {
        Self { generator }
    }
}

impl<G: IdGenerator + ?Sized> Iterator for Ids<'_, G> {
    type Item = Result<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.try_create_id())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<G: IdGenerator + ?Sized> FusedIterator for Ids<'_, G> {}
