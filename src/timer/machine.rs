//! Pure countdown state machine, no runtime dependencies.
//!
//! Every transition takes the current time as an argument so the machine
//! can be tested on exact instants. The tick source lives in
//! [`CountdownTimer`](super::CountdownTimer).

use serde::{Deserialize, Serialize};

use super::CountdownDuration;
use crate::history::HistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    Idle,
    Running,
}

/// The countdown currently in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRun {
    /// Distinguishes this run from every earlier one on the same machine
    pub run_id: u64,
    pub task: String,
    pub started_at: i64,
    pub ends_at: i64,
}

/// Result of feeding one tick to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a run that was stopped or replaced
    Stale,
    /// Still counting down
    Running { remaining_ms: u64 },
    /// The run just expired; the machine is idle again
    Expired(HistoryEntry),
}

#[derive(Debug)]
pub struct TimerMachine {
    duration: CountdownDuration,
    active: Option<ActiveRun>,
    display_ms: u64,
    last_run_id: u64,
}

impl TimerMachine {
    /// Idle machine with the display preset to the full duration
    pub fn new(duration: CountdownDuration) -> Self {
        Self {
            duration,
            active: None,
            display_ms: duration.as_millis(),
            last_run_id: 0,
        }
    }

    /// Begin a countdown, cancelling any run in flight.
    ///
    /// Returns the new run id and the run it replaced, if any.
    pub fn start(&mut self, task: impl Into<String>, now_ms: i64) -> (u64, Option<ActiveRun>) {
        let replaced = self.active.take();
        self.last_run_id += 1;
        let run = ActiveRun {
            run_id: self.last_run_id,
            task: task.into(),
            started_at: now_ms,
            ends_at: now_ms.saturating_add(self.duration.as_signed_millis()),
        };
        self.display_ms = self.remaining_for(&run, now_ms);
        self.active = Some(run);
        (self.last_run_id, replaced)
    }

    /// Cancel the run in flight (if any) and reset the display to the full duration
    pub fn stop(&mut self) -> Option<ActiveRun> {
        self.display_ms = self.duration.as_millis();
        self.active.take()
    }

    pub fn tick(&mut self, run_id: u64, now_ms: i64) -> TickOutcome {
        let remaining_ms = match &self.active {
            Some(run) if run.run_id == run_id => self.remaining_for(run, now_ms),
            _ => return TickOutcome::Stale,
        };

        self.display_ms = remaining_ms;
        if remaining_ms > 0 {
            return TickOutcome::Running { remaining_ms };
        }

        match self.active.take() {
            Some(run) => TickOutcome::Expired(HistoryEntry::new(run.task, run.started_at)),
            None => TickOutcome::Stale,
        }
    }

    /// Time left right now: live while running, otherwise the last displayed value
    pub fn remaining_ms(&self, now_ms: i64) -> u64 {
        match &self.active {
            Some(run) => self.remaining_for(run, now_ms),
            None => self.display_ms,
        }
    }

    /// Value most recently pushed to the display
    pub fn display_ms(&self) -> u64 {
        self.display_ms
    }

    pub fn phase(&self) -> TimerPhase {
        if self.active.is_some() {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    pub fn active(&self) -> Option<&ActiveRun> {
        self.active.as_ref()
    }

    pub fn duration(&self) -> CountdownDuration {
        self.duration
    }

    // Backwards clock jumps clamp to zero rather than going negative.
    fn remaining_for(&self, run: &ActiveRun, now_ms: i64) -> u64 {
        u64::try_from(run.ends_at.saturating_sub(now_ms)).unwrap_or(0)
    }
}
