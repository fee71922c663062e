//! History module
//!
//! Append-only log of completed countdowns, persisted as a full snapshot
//! under a single key on every mutation.

pub mod backend;
pub mod entry;
pub mod store;

use std::sync::{Arc, Mutex};

// Re-export main types
pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use entry::HistoryEntry;
pub use store::{HistoryStore, HISTORY_KEY};

/// History store shared between the timer and the view layer
pub type SharedHistory = Arc<Mutex<HistoryStore>>;
