#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::{BitLayout, ConfigurationError, Error, OverflowStrategy, Result, TimeSource};

/// The tick of the last minted id and the sequence used within it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct GenState {
    pub(crate) last_tick: i64,
    pub(crate) sequence: u32,
}

impl GenState {
    /// Lower than any tick a generator accepts, so the first call always
    /// starts a new tick.
    pub(crate) const INITIAL: Self = Self {
        last_tick: -1,
        sequence: 0,
    };
}

/// Outcome of one attempt at minting an id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Ready { state: GenState, id: i64 },
    Exhausted { tick: i64 },
}

/// The immutable half of a generator: its id, layout and overflow strategy,
/// plus the state transition shared by the lock and atomic flavours.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Sequencer {
    pub(crate) generator_id: u32,
    pub(crate) layout: BitLayout,
    pub(crate) overflow_strategy: OverflowStrategy,
}

impl Sequencer {
    pub(crate) fn new(
        generator_id: u32,
        layout: BitLayout,
        overflow_strategy: OverflowStrategy,
    ) -> Result<Self> {
        if generator_id >= layout.max_generators() {
            return Err(ConfigurationError::GeneratorId {
                generator_id,
                max_generators: layout.max_generators(),
            }
            .into());
        }
        Ok(Self {
            generator_id,
            layout,
            overflow_strategy,
        })
    }

    /// Computes the state following `state` when the clock reads `tick`.
    ///
    /// Never mutates anything; the caller publishes the returned state.
    pub(crate) fn step(&self, state: GenState, tick: i64) -> Result<Step> {
        let masked = tick & self.layout.timestamp_mask();
        if tick < 0 || masked < state.last_tick {
            return Err(Self::cold_clock_behind(state.last_tick, tick, masked));
        }

        let next = if masked == state.last_tick {
            if state.sequence >= self.layout.sequence_mask() {
                return Ok(Step::Exhausted { tick: masked });
            }
            GenState {
                last_tick: masked,
                sequence: state.sequence + 1,
            }
        } else {
            GenState {
                last_tick: masked,
                sequence: 0,
            }
        };

        let id = self
            .layout
            .compose(next.last_tick, self.generator_id, next.sequence);
        Ok(Step::Ready { state: next, id })
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last_tick: i64, tick: i64, masked: i64) -> Error {
        let current_tick = if tick < 0 { tick } else { masked };
        #[cfg(feature = "tracing")]
        warn!(last_tick, current_tick, "clock moved backwards or wrapped around");
        Error::InvalidSystemClock {
            last_tick,
            current_tick,
        }
    }

    /// Runs `attempt` until it mints an id, applying the overflow strategy
    /// whenever a tick is exhausted.
    ///
    /// `attempt` must not hold any lock once it returns: spin-waiting happens
    /// here, between attempts.
    pub(crate) fn drive<T, F>(&self, time: &T, mut attempt: F) -> Result<i64>
    where
        T: TimeSource,
        F: FnMut() -> Result<Step>,
    {
        loop {
            match attempt()? {
                Step::Ready { id, .. } => return Ok(id),
                Step::Exhausted { tick } => match self.overflow_strategy {
                    OverflowStrategy::Throw => {
                        #[cfg(feature = "tracing")]
                        debug!(tick, "sequence exhausted");
                        return Err(Error::SequenceOverflow { tick });
                    }
                    OverflowStrategy::SpinWait => {
                        #[cfg(feature = "tracing")]
                        debug!(tick, "sequence exhausted; waiting for next tick");
                        self.wait_for_next_tick(time, tick);
                    }
                },
            }
        }
    }

    fn wait_for_next_tick<T: TimeSource>(&self, time: &T, tick: i64) {
        while time.current_tick() & self.layout.timestamp_mask() == tick {
            std::thread::yield_now();
        }
    }

    /// Packs a published state into the word stored by the atomic generator.
    /// States are only ever published after minting, so the packed word is
    /// the id itself.
    pub(crate) fn pack(&self, state: GenState) -> u64 {
        if state == GenState::INITIAL {
            return UNSET;
        }
        self.layout
            .compose(state.last_tick, self.generator_id, state.sequence) as u64
    }

    pub(crate) fn unpack(&self, raw: u64) -> GenState {
        if raw == UNSET {
            return GenState::INITIAL;
        }
        let id = raw as i64;
        GenState {
            last_tick: (id >> self.layout.timestamp_shift()) & self.layout.timestamp_mask(),
            sequence: (id as u32) & self.layout.sequence_mask(),
        }
    }
}

/// Stored by the atomic generator before it mints anything. Ids never set
/// the top bit, so this cannot collide with one.
pub(crate) const UNSET: u64 = u64::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer(layout: BitLayout) -> Sequencer {
        Sequencer::new(5, layout, OverflowStrategy::Throw).unwrap()
    }

    #[test]
    fn first_step_starts_a_tick() {
        let s = sequencer(BitLayout::DEFAULT);
        let step = s.step(GenState::INITIAL, 0).unwrap();
        assert_eq!(
            step,
            Step::Ready {
                state: GenState {
                    last_tick: 0,
                    sequence: 0
                },
                id: 20_480
            }
        );
    }

    #[test]
    fn exhausted_tick_leaves_state_alone() {
        let s = sequencer(BitLayout::new(41, 20, 2).unwrap());
        let full = GenState {
            last_tick: 9,
            sequence: 3,
        };
        assert_eq!(s.step(full, 9).unwrap(), Step::Exhausted { tick: 9 });
    }

    #[test]
    fn regression_and_negative_ticks_are_rejected() {
        let s = sequencer(BitLayout::DEFAULT);
        let state = GenState {
            last_tick: 100,
            sequence: 0,
        };
        assert_eq!(
            s.step(state, 99),
            Err(Error::InvalidSystemClock {
                last_tick: 100,
                current_tick: 99
            })
        );
        assert_eq!(
            s.step(GenState::INITIAL, -3),
            Err(Error::InvalidSystemClock {
                last_tick: -1,
                current_tick: -3
            })
        );
    }

    #[test]
    fn generator_id_must_fit_layout() {
        assert_eq!(
            Sequencer::new(1024, BitLayout::DEFAULT, OverflowStrategy::Throw).unwrap_err(),
            Error::Configuration(ConfigurationError::GeneratorId {
                generator_id: 1024,
                max_generators: 1024
            })
        );
        assert!(Sequencer::new(1023, BitLayout::DEFAULT, OverflowStrategy::Throw).is_ok());
    }

    #[test]
    fn pack_and_unpack_agree_on_minted_states() {
        let s = sequencer(BitLayout::DEFAULT);
        assert_eq!(s.unpack(UNSET), GenState::INITIAL);
        assert_eq!(s.pack(GenState::INITIAL), UNSET);

        let state = GenState {
            last_tick: 1,
            sequence: 7,
        };
        assert_eq!(s.pack(state), 4_214_791);
        assert_eq!(s.unpack(4_214_791), state);
    }
}
