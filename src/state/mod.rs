//! State management module
//!
//! Application state shared with the HTTP layer and the timer status snapshot.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::TimerStatus;
