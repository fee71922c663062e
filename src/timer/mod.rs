//! Timer module
//!
//! The single-countdown state machine and the Tokio tick source that drives it.

pub mod countdown;
pub mod events;
pub mod machine;

use std::time::Duration;

use crate::error::ConfigError;

// Re-export main types
pub use countdown::CountdownTimer;
pub use events::TimerEvent;
pub use machine::{ActiveRun, TickOutcome, TimerMachine, TimerPhase};

/// Fallback countdown length when none is configured
pub const DEFAULT_DURATION_MS: i64 = 5000;

/// Fixed tick cadence when none is configured
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Length of one countdown in milliseconds, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CountdownDuration(i64);

impl CountdownDuration {
    pub fn try_from_millis(ms: i64) -> Result<Self, ConfigError> {
        if ms < 0 {
            return Err(ConfigError::NegativeDuration(ms));
        }
        Ok(Self(ms))
    }

    pub fn as_millis(&self) -> u64 {
        self.0.unsigned_abs()
    }

    pub(crate) fn as_signed_millis(&self) -> i64 {
        self.0
    }
}

impl Default for CountdownDuration {
    fn default() -> Self {
        Self(DEFAULT_DURATION_MS)
    }
}

impl TryFrom<i64> for CountdownDuration {
    type Error = ConfigError;

    fn try_from(ms: i64) -> Result<Self, Self::Error> {
        Self::try_from_millis(ms)
    }
}

/// Validated construction parameters for a countdown timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    pub duration: CountdownDuration,
    pub tick_interval: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration: CountdownDuration::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
