use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Poll, Result, Sequencer, SnowId, generator::next_state};

/// A lock-free sequencer suitable for multi-threaded environments.
///
/// The packed state is stored in an [`AtomicU64`] and advanced with a
/// compare-and-swap loop. The clock is read after the state is loaded; when
/// the swap loses a race the whole step (load, clock read, transition) is
/// retried, so no caller ever issues an ID from a stale state.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`BasicSequencer`]
/// - [`LockSequencer`]
///
/// [`BasicSequencer`]: crate::BasicSequencer
/// [`LockSequencer`]: crate::LockSequencer
#[derive(Debug)]
pub struct AtomicSequencer {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
}

impl Sequencer for AtomicSequencer {
    fn from_state(state: SnowId) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(state.to_raw())),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(state.to_raw()),
        }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    fn try_poll(&self, mut now: impl FnMut() -> Result<u64>) -> Result<Poll> {
        loop {
            let current_raw = self.state.load(Ordering::Acquire);
            let poll = next_state(SnowId::from_raw(current_raw), now()?)?;

            let Poll::Ready { id } = poll else {
                return Ok(poll);
            };

            if self
                .state
                .compare_exchange(
                    current_raw,
                    id.to_raw(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return Ok(poll);
            }

            // Another thread won the race.
            core::hint::spin_loop();
        }
    }

    fn last_issued(&self) -> Result<SnowId> {
        Ok(SnowId::from_raw(self.state.load(Ordering::Acquire)))
    }
}
