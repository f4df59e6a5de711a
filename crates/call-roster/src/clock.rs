//! Injectable time source for admission-state timestamps.
//!
//! Timestamps are offsets from an arbitrary origin, not wall-clock time.
//! Implementations must be monotonically non-decreasing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonically non-decreasing time values.
pub trait Clock: Send + Sync {
    /// Current time as an offset from the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`], with its origin at construction time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
///
/// Used by the replay tool, where scripts advance time explicitly, and by
/// unit tests that need to pin exact timestamps.
#[derive(Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `start`.
    #[must_use]
    pub fn starting_at(start: Duration) -> Self {
        Self {
            now_ms: AtomicU64::new(duration_to_ms(start)),
        }
    }

    /// Move the clock forward. Time never goes backwards.
    pub fn advance(&self, by: Duration) {
        let by_ms = duration_to_ms(by);
        // fetch_update never fails with a closure that always returns Some
        let _ = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(by_ms))
            });
    }

    /// Jump to `at` if it is later than the current reading.
    pub fn set(&self, at: Duration) {
        self.now_ms.fetch_max(duration_to_ms(at), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &self.now())
            .finish()
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::default();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_millis(250));
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(500));
    }

    #[test]
    fn test_manual_clock_set_ignores_earlier_time() {
        let clock = ManualClock::starting_at(Duration::from_secs(10));

        clock.set(Duration::from_secs(5));
        assert_eq!(clock.now(), Duration::from_secs(10));

        clock.set(Duration::from_secs(12));
        assert_eq!(clock.now(), Duration::from_secs(12));
    }
}
