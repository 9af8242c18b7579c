use crate::SnowId;

/// Represents the result of one attempt to generate an ID.
///
/// - [`Poll::Ready`] indicates a new ID was successfully generated.
/// - [`Poll::Pending`] means the sequence for the current millisecond is
///   exhausted and no ID can be issued until the clock reaches `yield_until`.
///
/// This allows non-blocking generation loops and caller-chosen back-off.
///
/// # Example
///
/// ```
/// use snowid::{LockSequencer, Poll, TimeSource, UniqueIdGenerator, MachineId, IdForm};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_000
///     }
/// }
///
/// let generator: UniqueIdGenerator<LockSequencer, _> =
///     UniqueIdGenerator::from_parts(0, MachineId::new(1).unwrap(), IdForm::Decimal, FixedTime);
/// match generator.try_poll().unwrap() {
///     Poll::Ready { id } => assert_eq!(id.timestamp(), 1_000),
///     Poll::Pending { yield_until } => println!("back off until: {yield_until}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowId,
    },
    /// No ID could be generated because the sequence has been exhausted for the
    /// current millisecond.
    Pending {
        /// The epoch-relative millisecond (inclusive) at which generation may
        /// resume.
        yield_until: u64,
    },
}
