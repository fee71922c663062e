//! Countdown timer driven by a Tokio tick task

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use super::{
    events::TimerEvent,
    machine::{TickOutcome, TimerMachine},
    CountdownDuration, TimerSettings,
};
use crate::{
    clock::{format_countdown, Clock},
    history::{HistoryEntry, SharedHistory},
    state::TimerStatus,
};

/// Single-countdown timer handle.
///
/// Clones control the same countdown. `start` and `stop` cancel the
/// previous tick task before returning, and a tick that was already in
/// flight finds its run id replaced and emits nothing.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    inner: Arc<TimerInner>,
}

#[derive(Debug)]
struct TimerInner {
    cell: Mutex<TimerCell>,
    clock: Arc<dyn Clock>,
    history: SharedHistory,
    tick_interval: Duration,
    /// Channel for tick/completion observers
    event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for the latest status snapshot
    status_tx: watch::Sender<TimerStatus>,
}

#[derive(Debug)]
struct TimerCell {
    machine: TimerMachine,
    tick_task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Create an idle timer that records completions into `history`
    pub fn new(settings: TimerSettings, clock: Arc<dyn Clock>, history: SharedHistory) -> Self {
        let machine = TimerMachine::new(settings.duration);
        let (event_tx, _) = broadcast::channel(100);
        let initial = TimerStatus::from_machine(&machine, clock.now_millis());
        let (status_tx, _) = watch::channel(initial);

        Self {
            inner: Arc::new(TimerInner {
                cell: Mutex::new(TimerCell {
                    machine,
                    tick_task: None,
                }),
                clock,
                history,
                tick_interval: settings.tick_interval,
                event_tx,
                status_tx,
            }),
        }
    }

    /// Start a countdown for `task`, replacing any countdown already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, task: impl Into<String>) -> TimerStatus {
        let task = task.into();
        let mut cell = self.inner.lock_cell();
        cancel_tick_task(&mut cell);

        let now = self.inner.clock.now_millis();
        let (run_id, replaced) = cell.machine.start(task.clone(), now);
        match replaced {
            Some(previous) => info!(
                "Restarting countdown: {:?} replaces {:?}",
                task, previous.task
            ),
            None => info!(
                "Starting countdown for {:?} ({} ms)",
                task,
                cell.machine.duration().as_millis()
            ),
        }

        cell.tick_task = Some(tokio::spawn(tick_loop(
            Arc::downgrade(&self.inner),
            run_id,
            self.inner.tick_interval,
        )));

        self.inner.emit(TimerEvent::Started {
            task,
            started_at: now,
        });
        self.inner.publish(&cell.machine, now)
    }

    /// Cancel the running countdown, if any, and reset the display to the full duration
    pub fn stop(&self) -> TimerStatus {
        let mut cell = self.inner.lock_cell();
        cancel_tick_task(&mut cell);

        if let Some(run) = cell.machine.stop() {
            info!("Stopped countdown for {:?}", run.task);
        }
        self.inner.emit_display(cell.machine.display_ms());
        self.inner.publish(&cell.machine, self.inner.clock.now_millis())
    }

    /// Current status with the remaining time computed against the clock
    pub fn status(&self) -> TimerStatus {
        let cell = self.inner.lock_cell();
        TimerStatus::from_machine(&cell.machine, self.inner.clock.now_millis())
    }

    /// Register for tick and completion events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Watch the status published on every transition and tick
    pub fn watch_status(&self) -> watch::Receiver<TimerStatus> {
        self.inner.status_tx.subscribe()
    }

    pub fn duration(&self) -> CountdownDuration {
        self.inner.lock_cell().machine.duration()
    }

    /// Whether a tick task is currently alive
    pub fn has_tick_task(&self) -> bool {
        self.inner
            .lock_cell()
            .tick_task
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl TimerInner {
    fn lock_cell(&self) -> MutexGuard<'_, TimerCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Feed one tick to the machine; returns whether the tick task should keep going
    fn on_tick(&self, run_id: u64) -> bool {
        let mut cell = self.lock_cell();
        let now = self.clock.now_millis();

        match cell.machine.tick(run_id, now) {
            TickOutcome::Stale => {
                debug!("Dropping stale tick for run {}", run_id);
                false
            }
            TickOutcome::Running { remaining_ms } => {
                debug!("Countdown tick: {} ms remaining", remaining_ms);
                self.emit_display(remaining_ms);
                self.publish(&cell.machine, now);
                true
            }
            TickOutcome::Expired(entry) => {
                // This task is the one finishing; just forget its handle
                cell.tick_task = None;
                info!("Countdown for {:?} completed", entry.task);

                self.emit_display(0);
                self.publish(&cell.machine, now);

                // Written outside the timer lock; the backend may block on disk
                drop(cell);
                self.record(&entry);
                self.emit(TimerEvent::Completed(entry));
                false
            }
        }
    }

    fn record(&self, entry: &HistoryEntry) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = history.append(entry.clone()) {
            error!("Failed to persist history entry: {}", e);
        }
    }

    fn emit_display(&self, remaining_ms: u64) {
        self.emit(TimerEvent::Tick {
            remaining_ms,
            display: format_countdown(remaining_ms),
        });
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is normal when nothing is watching
        if self.event_tx.send(event).is_err() {
            debug!("No timer event subscribers");
        }
    }

    fn publish(&self, machine: &TimerMachine, now_ms: i64) -> TimerStatus {
        let status = TimerStatus::from_machine(machine, now_ms);
        self.status_tx.send_replace(status.clone());
        status
    }
}

fn cancel_tick_task(cell: &mut TimerCell) {
    if let Some(handle) = cell.tick_task.take() {
        handle.abort();
    }
}

/// Periodic tick source for one run; exits on expiry, cancellation or timer drop
async fn tick_loop(timer: Weak<TimerInner>, run_id: u64, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(timer) = timer.upgrade() else {
            break;
        };
        if !timer.on_tick(run_id) {
            break;
        }
    }
}
