/// What a generator does when a tick's sequence space is exhausted.
///
/// Dispatched inside the generation loop; there is no maximum spin bound or
/// backoff. Callers needing a deadline must enforce it themselves.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OverflowStrategy {
    /// Fail with [`Error::SequenceOverflow`], leaving the generator state
    /// unchanged.
    ///
    /// [`Error::SequenceOverflow`]: crate::Error::SequenceOverflow
    #[default]
    Throw,
    /// Busy-wait, yielding the processor but not the generator state, until
    /// the time source reports a different tick, then retry.
    SpinWait,
}
