use crate::{MachineId, Poll, Result, SnowId};

/// Storage strategy for the sequence state of a generator.
///
/// A sequencer owns the last issued ID, which packs the last timestamp, the
/// machine ID and the sequence counter into one word. Each implementation
/// decides how that word is shared between callers; the transition rules are
/// the same for all of them.
///
/// The clock is passed in as a closure so that implementations can read it
/// inside their critical section. Two callers racing on the same millisecond
/// therefore always receive distinct sequence values.
pub trait Sequencer: Sized {
    /// Creates a sequencer whose last timestamp and sequence are zero.
    fn new(machine_id: MachineId) -> Self {
        Self::from_state(SnowId::from_components(0, machine_id.into(), 0))
    }

    /// Creates a sequencer preloaded with `state` as the last issued ID.
    ///
    /// Mostly useful for tests that need to start from a full sequence or a
    /// specific timestamp.
    fn from_state(state: SnowId) -> Self;

    /// Attempts to issue the next ID.
    ///
    /// `now` returns the current epoch-relative time in milliseconds and is
    /// called while the state is held. Errors from `now` are propagated
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if `now` precedes the last issued
    ///   timestamp
    /// - [`Error::LockPoisoned`] for a poisoned std mutex
    /// - whatever `now` returns
    ///
    /// On error the state is unchanged.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::LockPoisoned`]: crate::Error
    fn try_poll(&self, now: impl FnMut() -> Result<u64>) -> Result<Poll>;

    /// Returns the last issued ID (the initial state if none was issued).
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn last_issued(&self) -> Result<SnowId>;
}
