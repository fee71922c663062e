//! Task Timer - a single-task countdown timer with a persisted history
//!
//! A countdown is started for a named task; when it runs out, a completion
//! record (task name and start time) is appended to a history log that is
//! written through to a key-value store. The HTTP layer in [`api`] is one
//! possible view; anything can drive [`timer::CountdownTimer`] directly and
//! observe it through its event and status channels.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod state;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{format_countdown, Clock};
pub use config::Config;
pub use error::{ConfigError, StorageError};
pub use history::{HistoryEntry, HistoryStore};
pub use state::AppState;
pub use timer::{CountdownTimer, TimerEvent, TimerSettings};
pub use utils::signals::shutdown_signal;
