use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BitLayout, GeneratorOptions, Id, IdGenerator, OverflowStrategy, Result, TimeSource,
    generator::{GenState, Mutex, Sequencer, Step},
    id::decode_with,
};

/// A lock-based id generator suitable for multi-threaded environments.
///
/// The tick and sequence of the last minted id live behind a [`Mutex`]; the
/// clock is read and the state advanced while holding it, so ids come out
/// strictly increasing in lock acquisition order. With the `parking-lot`
/// feature the mutex is `parking_lot`'s, which never poisons.
///
/// ## Recommended When
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`AtomicIdGenerator`]
///
/// # Example
///
/// ```
/// use idgen::{GeneratorOptions, IdGenerator, LockIdGenerator};
///
/// let generator = LockIdGenerator::with_options(7, GeneratorOptions::default()).unwrap();
/// let first = generator.create_id();
/// let second = generator.create_id();
/// assert!(second > first);
/// assert_eq!(generator.decode(second).generator_id(), 7);
/// ```
///
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
#[derive(Debug)]
pub struct LockIdGenerator<T> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<GenState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<GenState>,
    sequencer: Sequencer,
    time: T,
}

impl<T: TimeSource> LockIdGenerator<T> {
    /// Creates a generator with the default layout and
    /// [`OverflowStrategy::Throw`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `generator_id` does not fit the
    /// layout.
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
            state: crossbeam_utils::CachePadded::new(Mutex::new(GenState::INITIAL)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(GenState::INITIAL),
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
        #[cfg(feature = "parking-lot")]
        let mut state = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut state = self.state.lock()?;

        let step = self.sequencer.step(*state, self.time.current_tick())?;
        if let Step::Ready { state: next, .. } = step {
            *state = next;
        }
        Ok(step)
    }
}

impl<T: TimeSource> IdGenerator for LockIdGenerator<T> {
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
