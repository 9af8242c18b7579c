use std::time::{SystemTime, UNIX_EPOCH};

mod mono_clock;

pub use mono_clock::*;

/// Default epoch: Tuesday, January 1, 2019 00:00:00 UTC, in milliseconds since
/// the Unix epoch.
pub const DEFAULT_EPOCH: i64 = 1_546_300_800_000;

/// A trait for clocks reporting absolute wall-clock time.
///
/// The unit is **milliseconds since the Unix epoch**. The generator subtracts
/// its configured epoch from this value before encoding, so any time source
/// can be paired with any epoch. Plugging in a mocked source makes generation
/// deterministic in tests.
///
/// # Example
///
/// ```
/// use snowid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_546_300_800_123
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_546_300_800_123);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

/// Reads `SystemTime::now()` on every call.
///
/// This clock follows every wall-clock adjustment, including backward jumps,
/// which generators surface as [`Error::ClockMovedBackwards`].
///
/// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
#[derive(Default, Clone, Copy, Debug)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> i64 {
        unix_millis(SystemTime::now())
    }
}

/// Converts a `SystemTime` to signed milliseconds since the Unix epoch.
pub(crate) fn unix_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}
