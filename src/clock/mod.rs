//! Clock module
//!
//! Countdown display formatting and the time sources the timer reads from.

pub mod format;
pub mod source;

// Re-export main items
pub use format::format_countdown;
pub use source::{Clock, ManualClock, MonotonicClock, SystemClock};
