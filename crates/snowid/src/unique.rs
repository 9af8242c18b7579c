#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, GeneratorConfig, IdForm, IdValue, IntoSnowId, IntoTimestamp, LockSequencer, MachineId,
    Poll, RandSource, Result, Sequencer, SnowId, ThreadRandom, TimeSource, WallClock,
};

/// Generates time-sortable [`SnowId`]s for one machine ID and epoch.
///
/// The generator composes a validated [`MachineId`], an epoch, a
/// [`Sequencer`] holding the per-millisecond state and a [`TimeSource`].
/// Only [`generate`](Self::generate) and [`try_poll`](Self::try_poll) touch
/// the sequence state; decoding and
/// [`generate_for_timestamp`](Self::generate_for_timestamp) are pure.
///
/// With the default [`LockSequencer`] the generator is `Send + Sync` and can
/// be shared behind an `Arc`.
///
/// # Example
/// ```
/// use snowid::{GeneratorConfig, UniqueIdGenerator};
///
/// let generator = UniqueIdGenerator::new(&GeneratorConfig::default().with_machine_id(7)).unwrap();
/// let id = generator.generate().unwrap();
///
/// assert_eq!(generator.decode_machine_id(id).unwrap(), 7);
/// assert!(generator.decode_timestamp(id.to_string()).unwrap() >= generator.epoch());
/// ```
#[derive(Debug)]
pub struct UniqueIdGenerator<S = LockSequencer, T = WallClock> {
    epoch: i64,
    machine_id: MachineId,
    form: IdForm,
    sequencer: S,
    time: T,
}

impl UniqueIdGenerator {
    /// Builds a thread-safe generator reading the system wall clock.
    ///
    /// A missing machine ID is drawn from the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MachineIdOutOfRange`] if the configured machine ID is
    /// negative or above 4095.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Self::from_config(config, WallClock, &ThreadRandom)
    }
}

impl<S, T> UniqueIdGenerator<S, T>
where
    S: Sequencer,
    T: TimeSource,
{
    /// Builds a generator from `config` with an explicit clock and random
    /// source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MachineIdOutOfRange`] if the configured machine ID is
    /// negative or above 4095.
    pub fn from_config(
        config: &GeneratorConfig,
        time: T,
        rng: &impl RandSource<u16>,
    ) -> Result<Self> {
        let machine_id = MachineId::resolve(config.machine_id, rng)?;
        Ok(Self::from_parts(
            config.epoch_or_default(),
            machine_id,
            config.form(),
            time,
        ))
    }

    /// Builds a generator from already validated parts.
    ///
    /// The sequence state starts at timestamp zero, sequence zero.
    pub fn from_parts(epoch: i64, machine_id: MachineId, form: IdForm, time: T) -> Self {
        Self {
            epoch,
            machine_id,
            form,
            sequencer: S::new(machine_id),
            time,
        }
    }

    /// Builds a generator around an existing sequencer, resuming after the
    /// sequencer's last issued ID. The machine ID is taken from that ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`](crate::Error) if the sequencer's lock
    /// is poisoned.
    pub fn from_sequencer(epoch: i64, form: IdForm, sequencer: S, time: T) -> Result<Self> {
        // 12-bit field.
        let machine_id = MachineId::new(sequencer.last_issued()?.machine_id() as u16)?;
        Ok(Self {
            epoch,
            machine_id,
            form,
            sequencer,
            time,
        })
    }

    /// Epoch in milliseconds since the Unix epoch.
    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    /// The resolved machine ID encoded into every generated ID.
    pub fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    /// The form [`generate_value`](Self::generate_value) renders IDs in.
    pub fn form(&self) -> IdForm {
        self.form
    }

    /// The sequence state backing this generator.
    pub fn sequencer(&self) -> &S {
        &self.sequencer
    }

    /// Attempts to issue the next ID without blocking.
    ///
    /// Returns [`Poll::Pending`] when the current millisecond's sequence is
    /// exhausted; the caller decides how to wait.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBeforeEpoch`] if the clock reads earlier than the epoch
    /// - [`Error::TimestampOverflow`] if the clock is past the 41-bit range
    /// - [`Error::ClockMovedBackwards`] if the clock is behind the last issued
    ///   ID
    ///
    /// The sequence state is unchanged on error.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll(&self) -> Result<Poll> {
        self.sequencer.try_poll(|| self.elapsed())
    }

    /// Issues the next ID, calling `f` with the epoch-relative millisecond to
    /// wait for whenever the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`try_poll`](Self::try_poll).
    pub fn generate_with(&self, mut f: impl FnMut(u64)) -> Result<SnowId> {
        loop {
            match self.try_poll()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_until } => f(yield_until),
            }
        }
    }

    /// Issues the next ID.
    ///
    /// When more than 1024 IDs are requested within one millisecond the call
    /// stalls, yielding the thread, until the clock ticks over. The stall is
    /// bounded by the clock resolution and cannot be cancelled.
    ///
    /// # Errors
    ///
    /// Same as [`try_poll`](Self::try_poll). A clock rollback is reported,
    /// never waited out; retrying is up to the caller.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowId> {
        self.generate_with(|_| std::thread::yield_now())
    }

    /// Issues the next ID rendered in the configured [`IdForm`].
    ///
    /// # Errors
    ///
    /// Same as [`generate`](Self::generate).
    pub fn generate_value(&self) -> Result<IdValue> {
        Ok(self.form.render(self.generate()?))
    }

    /// Builds the smallest ID this machine could issue at `timestamp`.
    ///
    /// The result carries sequence zero and this generator's machine ID; the
    /// sequence state is neither read nor written. Useful as the lower bound
    /// of a range query ("created at or after `timestamp`").
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTimestamp`] for unparsable text
    /// - [`Error::TimestampBeforeEpoch`] if `timestamp` precedes the epoch
    /// - [`Error::TimestampOverflow`] if it is past the 41-bit range
    pub fn generate_for_timestamp(&self, timestamp: impl IntoTimestamp) -> Result<SnowId> {
        let timestamp = timestamp.into_timestamp()?;
        let delta = delta_since(self.epoch, timestamp).ok_or(Error::TimestampBeforeEpoch {
            timestamp,
            epoch: self.epoch,
        })??;
        Ok(SnowId::from_components(delta, self.machine_id.into(), 0))
    }

    /// Returns the Unix millisecond timestamp encoded in `id`.
    ///
    /// Only meaningful for IDs produced with the same epoch as this
    /// generator; other IDs decode to a consistently shifted value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for unparsable text or a value
    /// with the reserved bit set, whichever form it arrives in.
    pub fn decode_timestamp(&self, id: impl IntoSnowId) -> Result<i64> {
        let id = id.into_snow_id()?;
        Ok(self.epoch.saturating_add_unsigned(id.timestamp()))
    }

    /// Returns the machine ID encoded in `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for unparsable text or a value
    /// with the reserved bit set, whichever form it arrives in.
    pub fn decode_machine_id(&self, id: impl IntoSnowId) -> Result<u16> {
        let id = id.into_snow_id()?;
        // 12-bit field.
        Ok(id.machine_id() as u16)
    }

    /// Returns the sequence encoded in `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for unparsable text or a value
    /// with the reserved bit set, whichever form it arrives in.
    pub fn decode_sequence(&self, id: impl IntoSnowId) -> Result<u16> {
        let id = id.into_snow_id()?;
        // 10-bit field.
        Ok(id.sequence() as u16)
    }

    fn elapsed(&self) -> Result<u64> {
        let now = self.time.current_millis();
        delta_since(self.epoch, now).ok_or(Error::ClockBeforeEpoch {
            now,
            epoch: self.epoch,
        })?
    }
}

/// Milliseconds from `epoch` to `timestamp`.
///
/// `None` when `timestamp` precedes `epoch`; an overflow error when the delta
/// does not fit the timestamp field.
fn delta_since(epoch: i64, timestamp: i64) -> Option<Result<u64>> {
    let delta = i128::from(timestamp) - i128::from(epoch);
    if delta < 0 {
        return None;
    }
    let delta = u64::try_from(delta).unwrap_or(u64::MAX);
    if delta > SnowId::MAX_TIMESTAMP {
        return Some(Err(Error::TimestampOverflow { delta }));
    }
    Some(Ok(delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_bounds() {
        assert_eq!(delta_since(100, 100), Some(Ok(0)));
        assert_eq!(delta_since(100, 99), None);
        assert_eq!(
            delta_since(0, SnowId::MAX_TIMESTAMP as i64),
            Some(Ok(SnowId::MAX_TIMESTAMP))
        );
        assert_eq!(
            delta_since(0, SnowId::MAX_TIMESTAMP as i64 + 1),
            Some(Err(Error::TimestampOverflow {
                delta: SnowId::MAX_TIMESTAMP + 1
            }))
        );
        assert_eq!(
            delta_since(i64::MIN, i64::MAX),
            Some(Err(Error::TimestampOverflow { delta: u64::MAX }))
        );
    }
}
