//! Countdown display formatting

/// Format a remaining duration as `M:SS`.
///
/// Milliseconds are rounded to the nearest second (half rounds up), so a
/// remaining 999 ms still reads `0:01`. Minutes are never padded and have
/// no upper bound.
pub fn format_countdown(remaining_ms: u64) -> String {
    let total_seconds = remaining_ms / 1000 + u64::from(remaining_ms % 1000 >= 500);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}
