//! Time sources for countdowns.

use std::{
    fmt,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use chrono::Utc;

/// Clock abstraction so the timer can be driven by fake time in tests.
///
/// Values are epoch milliseconds. Nothing guarantees they never go backwards.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_millis(&self) -> i64;
}

/// Host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall clock read once at construction and advanced by the Tokio clock.
///
/// Immune to host clock adjustments while the process runs. Under a paused
/// Tokio runtime it follows virtual time, which makes it the clock of choice
/// for driving real tick tasks in tests.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch_ms: i64,
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now().timestamp_millis())
    }

    pub fn anchored_at(epoch_ms: i64) -> Self {
        Self {
            epoch_ms,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> i64 {
        let elapsed = i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.epoch_ms.saturating_add(elapsed)
    }
}

/// Hand-driven clock; clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Move the clock by `delta_ms`, which may be negative.
    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        clock.advance(500);
        assert_eq!(other.now_millis(), 1_500);
        other.set(10);
        assert_eq!(clock.now_millis(), 10);
        clock.advance(-20);
        assert_eq!(clock.now_millis(), -10);
    }

    #[tokio::test(start_paused = true)]
    async fn monotonic_clock_follows_tokio_time() {
        let clock = MonotonicClock::anchored_at(1_700_000_000_000);
        assert_eq!(clock.now_millis(), 1_700_000_000_000);
        tokio::time::advance(Duration::from_millis(2_500)).await;
        assert_eq!(clock.now_millis(), 1_700_000_002_500);
    }

    #[test]
    fn system_clock_is_epoch_millis() {
        let before = Utc::now().timestamp_millis();
        let now = SystemClock.now_millis();
        assert!(now >= before);
    }
}
