#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Poll, Result, Sequencer, SnowId,
    generator::{Mutex, MutexGuard, next_state},
};

/// A lock-based sequencer suitable for multi-threaded environments.
///
/// The state is guarded by a [`Mutex`] (`std` by default, `parking_lot` with
/// the `parking-lot` feature). The clock is read while the lock is held, so a
/// caller can never observe a timestamp older than the one another caller has
/// just issued.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`BasicSequencer`]
/// - [`AtomicSequencer`]
///
/// [`BasicSequencer`]: crate::BasicSequencer
/// [`AtomicSequencer`]: crate::AtomicSequencer
#[derive(Debug)]
pub struct LockSequencer {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<SnowId>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<SnowId>,
}

impl LockSequencer {
    fn lock(&self) -> Result<MutexGuard<'_, SnowId>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl Sequencer for LockSequencer {
    fn from_state(state: SnowId) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(state),
        }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    fn try_poll(&self, mut now: impl FnMut() -> Result<u64>) -> Result<Poll> {
        let mut state = self.lock()?;
        let poll = next_state(*state, now()?)?;
        if let Poll::Ready { id } = poll {
            *state = id;
        }
        Ok(poll)
    }

    fn last_issued(&self) -> Result<SnowId> {
        Ok(*self.lock()?)
    }
}
