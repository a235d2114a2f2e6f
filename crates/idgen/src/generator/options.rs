use crate::{BitLayout, MonotonicClock, OverflowStrategy};

/// Construction options shared by every generator flavour.
///
/// The default pairs [`BitLayout::DEFAULT`] with a millisecond
/// [`MonotonicClock`] counting from [`DEFAULT_EPOCH`] and
/// [`OverflowStrategy::Throw`].
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use idgen::{
///     AtomicIdGenerator, BitLayout, GeneratorOptions, IdGenerator, MonotonicClock,
///     OverflowStrategy, TWITTER_EPOCH,
/// };
///
/// let options = GeneratorOptions::default()
///     .with_layout(BitLayout::new(45, 2, 16).unwrap())
///     .with_time_source(MonotonicClock::new(TWITTER_EPOCH, Duration::from_millis(10)).unwrap())
///     .with_overflow_strategy(OverflowStrategy::SpinWait);
///
/// let generator = AtomicIdGenerator::with_options(3, options).unwrap();
/// assert_eq!(generator.decode(generator.create_id()).generator_id(), 3);
/// ```
///
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
#[derive(Clone, Debug)]
pub struct GeneratorOptions<T> {
    /// How ids are split into fields.
    pub layout: BitLayout,
    /// Where ticks come from.
    pub time_source: T,
    /// What to do when a tick runs out of sequence numbers.
    pub overflow_strategy: OverflowStrategy,
}

impl Default for GeneratorOptions<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::default())
    }
}

impl<T> GeneratorOptions<T> {
    /// Default layout and strategy around the given time source.
    pub fn new(time_source: T) -> Self {
        Self {
            layout: BitLayout::DEFAULT,
            time_source,
            overflow_strategy: OverflowStrategy::default(),
        }
    }

    /// Replaces the bit layout.
    pub fn with_layout(mut self, layout: BitLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the sequence overflow strategy.
    pub fn with_overflow_strategy(mut self, overflow_strategy: OverflowStrategy) -> Self {
        self.overflow_strategy = overflow_strategy;
        self
    }

    /// Swaps the time source, keeping the layout and strategy.
    pub fn with_time_source<U>(self, time_source: U) -> GeneratorOptions<U> {
        GeneratorOptions {
            layout: self.layout,
            time_source,
            overflow_strategy: self.overflow_strategy,
        }
    }
}
