use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Poll, Result, Sequencer, SnowId, generator::next_state};

/// A non-concurrent sequencer suitable for single-threaded environments.
///
/// The state lives in a [`Cell`], so this sequencer is lightweight and fast,
/// but **not thread-safe** (`!Sync`).
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSequencer`]
/// - [`AtomicSequencer`]
///
/// [`LockSequencer`]: crate::LockSequencer
/// [`AtomicSequencer`]: crate::AtomicSequencer
#[derive(Debug)]
pub struct BasicSequencer {
    state: Cell<SnowId>,
}

impl Sequencer for BasicSequencer {
    fn from_state(state: SnowId) -> Self {
        Self {
            state: Cell::new(state),
        }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    fn try_poll(&self, mut now: impl FnMut() -> Result<u64>) -> Result<Poll> {
        let poll = next_state(self.state.get(), now()?)?;
        if let Poll::Ready { id } = poll {
            self.state.set(id);
        }
        Ok(poll)
    }

    fn last_issued(&self) -> Result<SnowId> {
        Ok(self.state.get())
    }
}
