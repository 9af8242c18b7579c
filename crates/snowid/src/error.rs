/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowid` can emit.
///
/// Construction-time variants ([`Error::InvalidMachineId`],
/// [`Error::MachineIdOutOfRange`]) prevent a generator from being built at
/// all. Every other variant is returned by an individual call and leaves the
/// generator state exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The supplied machine ID is not a whole number.
    #[error("machine id must be a whole number, got `{input}`")]
    InvalidMachineId { input: String },

    /// The supplied machine ID is negative or larger than
    /// [`MachineId::MAX`](crate::MachineId::MAX).
    #[error("machine id must be in 0..=4095, got {value}")]
    MachineIdOutOfRange { value: i64 },

    /// The wall clock reads earlier than the configured epoch.
    #[error("clock reads {now} ms, which is before the epoch {epoch} ms")]
    ClockBeforeEpoch { now: i64, epoch: i64 },

    /// A timestamp handed to `generate_for_timestamp` precedes the epoch.
    #[error("timestamp {timestamp} ms is before the epoch {epoch} ms")]
    TimestampBeforeEpoch { timestamp: i64, epoch: i64 },

    /// The clock moved backwards relative to the last issued ID.
    ///
    /// Both values are milliseconds relative to the generator epoch. The call
    /// may be retried once the clock catches up with `last`.
    #[error("clock moved backwards: last issued at {last} ms, now {now} ms")]
    ClockMovedBackwards { last: u64, now: u64 },

    /// The epoch-relative timestamp does not fit in the 41-bit field.
    #[error("timestamp delta {delta} ms does not fit in 41 bits")]
    TimestampOverflow { delta: u64 },

    /// A textual identifier is not a base-10 `u64` with the reserved bit
    /// clear.
    #[error("invalid identifier `{input}`")]
    InvalidIdentifier { input: String },

    /// A textual timestamp is not a base-10 integer.
    #[error("invalid timestamp `{input}`")]
    InvalidTimestamp { input: String },

    /// The state lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists when
    /// the `parking-lot` feature is disabled.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};

#[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
