//! Main application state management

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::TimerStatus;
use crate::{
    error::StorageError,
    history::{HistoryEntry, HistoryStore, SharedHistory},
    timer::CountdownTimer,
};

/// Main application state: the countdown, its history and server metadata
#[derive(Debug)]
pub struct AppState {
    /// The single countdown
    pub timer: CountdownTimer,
    /// Completion history, shared with the timer
    pub history: SharedHistory,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create a new AppState around an existing timer and history
    pub fn new(port: u16, host: String, timer: CountdownTimer, history: SharedHistory) -> Self {
        Self {
            timer,
            history,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Start a countdown for `task`
    pub fn start_timer(&self, task: &str) -> TimerStatus {
        self.record_action("start");
        self.timer.start(task)
    }

    /// Stop the countdown and reset the display
    pub fn stop_timer(&self) -> TimerStatus {
        self.record_action("stop");
        self.timer.stop()
    }

    /// Re-read the persisted history
    pub fn history_load(&self) -> Vec<HistoryEntry> {
        self.lock_history().load()
    }

    /// Current history in append order
    pub fn history_snapshot(&self) -> Vec<HistoryEntry> {
        self.lock_history().snapshot()
    }

    /// Number of recorded completions
    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    /// Erase the history, in memory and on disk
    pub fn history_clear(&self) -> Result<(), StorageError> {
        self.record_action("clear-history");
        self.lock_history().clear()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self
            .last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let last_action_time = *self
            .last_action_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        info!("Action: {}", action);
        *self.last_action.lock().unwrap_or_else(PoisonError::into_inner) = Some(action.to_string());
        *self
            .last_action_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
    }

    fn lock_history(&self) -> MutexGuard<'_, HistoryStore> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
