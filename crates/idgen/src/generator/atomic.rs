use core::time::Duration;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BitLayout, GeneratorOptions, Id, IdGenerator, OverflowStrategy, Result, TimeSource,
    generator::{Sequencer, Step, UNSET},
    id::decode_with,
};

/// A lock-free id generator suitable for multi-threaded environments.
///
/// The last minted id is stored in an [`AtomicU64`] and advanced with a
/// compare-and-swap loop, so contended callers retry instead of blocking.
/// Ids are unique and increasing in CAS success order.
///
/// ## Recommended When
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockIdGenerator`]
///
/// [`LockIdGenerator`]: crate::LockIdGenerator
#[derive(Debug)]
pub struct AtomicIdGenerator<T> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    sequencer: Sequencer,
    time: T,
}

impl<T: TimeSource> AtomicIdGenerator<T> {
    /// Creates a generator with the default layout and
    /// [`OverflowStrategy::Throw`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `generator_id` does not fit the
    /// layout.
    ///
    /// # Example
    ///
    /// ```
    /// use idgen::{AtomicIdGenerator, IdGenerator, MonotonicClock};
    ///
    /// let generator = AtomicIdGenerator::new(0, MonotonicClock::default()).unwrap();
    /// assert!(generator.create_id() > 0);
    /// assert!(AtomicIdGenerator::new(1024, MonotonicClock::default()).is_err());
    /// ```
    ///
    /// [`Error::Configuration`]: crate::Error::Configuration
    pub fn new(generator_id: u32, time: T) -> Result<Self> {
        Self::with_options(generator_id, GeneratorOptions::new(time))
    }

    /// Creates a generator from explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `generator_id` does not fit
    /// `options.layout`.
    ///
    /// [`Error::Configuration`]: crate::Error::Configuration
    pub fn with_options(generator_id: u32, options: GeneratorOptions<T>) -> Result<Self> {
        let sequencer = Sequencer::new(generator_id, options.layout, options.overflow_strategy)?;
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(UNSET)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(UNSET),
            sequencer,
            time: options.time_source,
        })
    }

    /// The time source ticks are read from.
    pub fn time_source(&self) -> &T {
        &self.time
    }

    /// What happens when a tick's sequence space runs out.
    pub fn overflow_strategy(&self) -> OverflowStrategy {
        self.sequencer.overflow_strategy
    }

    /// The epoch of the time source, as a [`Duration`] since the UNIX epoch.
    pub fn epoch(&self) -> Duration {
        self.time.epoch()
    }

    fn attempt(&self) -> Result<Step> {
        loop {
            let current = self.state.load(Ordering::Acquire);
            let step = self
                .sequencer
                .step(self.sequencer.unpack(current), self.time.current_tick())?;
            let Step::Ready { state, .. } = step else {
                return Ok(step);
            };

            let next = self.sequencer.pack(state);
            if self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Ok(step);
            }
            core::hint::spin_loop();
        }
    }
}

impl<T: TimeSource> IdGenerator for AtomicIdGenerator<T> {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_create_id(&self) -> Result<i64> {
        self.sequencer.drive(&self.time, || self.attempt())
    }

    fn decode(&self, id: i64) -> Id {
        decode_with(id, &self.sequencer.layout, &self.time)
    }

    fn generator_id(&self) -> u32 {
        self.sequencer.generator_id
    }

    fn layout(&self) -> BitLayout {
        self.sequencer.layout
    }
}
