//! Timer status snapshot handed to the view layer

use serde::{Deserialize, Serialize};

use crate::{
    clock::format_countdown,
    timer::{TimerMachine, TimerPhase},
};

/// Point-in-time view of the countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub phase: TimerPhase,
    /// Task of the running countdown
    pub task: Option<String>,
    /// Start instant of the running countdown, epoch milliseconds
    pub started_at: Option<i64>,
    pub remaining_ms: u64,
    /// `remaining_ms` rendered as `M:SS`
    pub display: String,
    pub duration_ms: u64,
}

impl TimerStatus {
    /// Build the status of `machine` as of `now_ms`
    pub fn from_machine(machine: &TimerMachine, now_ms: i64) -> Self {
        let remaining_ms = machine.remaining_ms(now_ms);
        let active = machine.active();

        Self {
            phase: machine.phase(),
            task: active.map(|run| run.task.clone()),
            started_at: active.map(|run| run.started_at),
            remaining_ms,
            display: format_countdown(remaining_ms),
            duration_ms: machine.duration().as_millis(),
        }
    }

    /// Check if a countdown is running
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }
}
