//! Fake clock returning a strictly increasing sequence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use call_roster::clock::Clock;

/// Clock that advances one millisecond on every read.
///
/// The first call to `now()` returns zero, the second one millisecond, and so
/// on. Because every read is observable, tests built on it also pin how many
/// times an operation consults the clock.
#[derive(Debug, Default)]
pub struct TickingClock {
    next_ms: AtomicU64,
}

impl TickingClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reads so far.
    pub fn reads(&self) -> u64 {
        self.next_ms.load(Ordering::SeqCst)
    }
}

impl Clock for TickingClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.next_ms.fetch_add(1, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_once_per_read() {
        let clock = TickingClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(1));
        assert_eq!(clock.reads(), 2);
    }
}
