use core::cmp::Ordering;

use crate::{Error, Poll, Result, SnowId};

/// Sequence state transition shared by every [`Sequencer`].
///
/// `current` is the last issued ID (or the initial zero state) and `now` the
/// epoch-relative clock reading. A `Ready` result carries the new state, which
/// is also the ID handed to the caller. `Pending` and errors leave the state
/// untouched.
///
/// [`Sequencer`]: crate::Sequencer
#[inline]
pub(crate) fn next_state(current: SnowId, now: u64) -> Result<Poll> {
    debug_assert!(now <= SnowId::MAX_TIMESTAMP, "timestamp overflow");
    let last = current.timestamp();

    match now.cmp(&last) {
        Ordering::Greater => Ok(Poll::Ready {
            id: current.rollover_to_timestamp(now),
        }),
        Ordering::Equal => {
            if current.has_sequence_room() {
                Ok(Poll::Ready {
                    id: current.increment_sequence(),
                })
            } else {
                Ok(Poll::Pending {
                    yield_until: last + 1,
                })
            }
        }
        Ordering::Less => cold_clock_behind(last, now),
    }
}

#[cold]
#[inline(never)]
fn cold_clock_behind(last: u64, now: u64) -> Result<Poll> {
    Err(Error::ClockMovedBackwards { last, now })
}
