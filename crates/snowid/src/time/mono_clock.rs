use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Instant, SystemTime},
};

use super::{TimeSource, unix_millis};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-clock-anchored time source that never moves backwards.
///
/// The wall clock is sampled once at construction; afterwards time advances
/// with a monotonic timer (`Instant`). NTP corrections or manual clock changes
/// made after construction are ignored, so a generator driven by this clock
/// never observes a clock rollback. The trade-off is drift: the reported time
/// slowly diverges from the system clock if the latter is corrected.
///
/// Internally a background thread refreshes a shared atomic counter once per
/// millisecond, keeping syscalls off the hot path. Clones share the ticker;
/// the thread exits once the last clone is dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    anchor: i64, // unix millis at construction
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a ticker anchored at the current wall-clock time.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use snowid::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let before = clock.current_millis();
    /// std::thread::sleep(Duration::from_millis(5));
    /// assert!(clock.current_millis() >= before);
    /// ```
    pub fn new() -> Self {
        Self::anchored_at(SystemTime::now())
    }

    /// Starts a ticker whose zero point is `anchor` instead of the current
    /// wall-clock time.
    pub fn anchored_at(anchor: SystemTime) -> Self {
        let start = Instant::now();
        let anchor = unix_millis(anchor);

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                inner_ref.current.store(now_ms, Ordering::Release);

                tick = now_ms.saturating_add(1);
            }
        });

        // Only this constructor sets the handle.
        let _ = inner._handle.set(handle);

        Self { inner, anchor }
    }
}

impl TimeSource for MonotonicClock {
    /// Returns the anchor plus the monotonic time elapsed since construction.
    fn current_millis(&self) -> i64 {
        let elapsed = self.inner.current.load(Ordering::Acquire);
        self.anchor
            .saturating_add(i64::try_from(elapsed).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WallClock;

    #[test]
    fn starts_near_wall_clock() {
        let wall = WallClock.current_millis();
        let clock = MonotonicClock::new();
        let mono = clock.current_millis();
        assert!((mono - wall).abs() < 1_000);
    }

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_over_time() {
        let clock = MonotonicClock::new();
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > before);
    }

    #[test]
    fn honours_custom_anchor() {
        let anchor = SystemTime::UNIX_EPOCH + Duration::from_millis(1_000);
        let clock = MonotonicClock::anchored_at(anchor);
        let now = clock.current_millis();
        assert!((1_000..1_000 + 1_000).contains(&now));
    }
}
