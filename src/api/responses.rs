//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{history::HistoryEntry, state::TimerStatus};

/// Body of POST /timer/start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    /// Free-form task name; missing means empty
    #[serde(default)]
    pub task: String,
}

/// API response structure for timer commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerStatus) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a running response
    pub fn running(message: String, timer: TimerStatus) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Create an idle response
    pub fn idle(message: String, timer: TimerStatus) -> Self {
        Self::new("idle".to_string(), message, timer)
    }
}

/// Status response with timer and history information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerStatus,
    pub history_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// History listing, oldest completion first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub entries: Vec<HistoryEntry>,
    /// Entries rendered as display lines, same order
    pub lines: Vec<String>,
}

impl HistoryResponse {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        let lines = entries.iter().map(HistoryEntry::display_line).collect();
        Self {
            count: entries.len(),
            entries,
            lines,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
