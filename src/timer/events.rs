//! Observation payloads broadcast by the countdown timer

use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;

/// Something a view layer can react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimerEvent {
    /// A countdown began (possibly replacing a running one)
    #[serde(rename_all = "camelCase")]
    Started { task: String, started_at: i64 },
    /// Display update, on every tick and on stop
    #[serde(rename_all = "camelCase")]
    Tick { remaining_ms: u64, display: String },
    /// A countdown ran out; fired once per start
    Completed(HistoryEntry),
}

impl TimerEvent {
    /// Event name used on the server-sent events stream
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Started { .. } => "started",
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::Completed(_) => "completed",
        }
    }
}
