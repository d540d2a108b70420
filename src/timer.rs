//! Single-shot deferred tasks.
//!
//! The scene clock ([`TimerQueue`]) is advanced by the engine once per frame
//! and is the primary way to defer work. [`ThreadTimer`] is the fallback when
//! no scene clock is reachable: it sleeps on a helper thread and then runs the
//! task. Either way a scheduled task fires exactly once and cannot be
//! cancelled.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

/// A deferred unit of work. `Send` so the thread fallback can run it.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Anything that can run a task once after a delay.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, task: Task);
}

struct PendingTask {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Frame-driven timer list measured on the engine's own clock.
#[derive(Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time this clock has been advanced by.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    /// Number of tasks that have not fired yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward by `dt` and run every task that is now due.
    ///
    /// Tasks fire in deadline order, ties broken by scheduling order.
    /// Returns how many tasks fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.now += dt;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by_key(|p| (p.due, p.seq));
        let fired = due.len();
        for p in due {
            (p.task)();
        }
        fired
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTask { due: self.now + delay, seq, task });
    }
}

/// Wall-clock fallback backed by a short-lived OS thread per task.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadTimer;

impl Scheduler for ThreadTimer {
    fn schedule(&mut self, delay: Duration, task: Task) {
        // The task is parked in a slot so it can still run inline if the
        // thread never starts.
        let slot = Arc::new(Mutex::new(Some(task)));
        let worker_slot = Arc::clone(&slot);

        let spawned = thread::Builder::new()
            .name("gridquiz-timer".into())
            .spawn(move || {
                thread::sleep(delay);
                let task = worker_slot.lock().ok().and_then(|mut t| t.take());
                if let Some(task) = task {
                    task();
                }
            });

        if let Err(e) = spawned {
            warn!("[timer] could not spawn timer thread ({e}); running task now");
            let task = slot.lock().ok().and_then(|mut t| t.take());
            if let Some(task) = task {
                task();
            }
        }
    }
}

/// Schedule on `primary` when available, otherwise on a [`ThreadTimer`].
pub fn schedule_or_fallback(primary: Option<&mut dyn Scheduler>, delay: Duration, task: Task) {
    match primary {
        Some(scheduler) => scheduler.schedule(delay, task),
        None => {
            debug!("[timer] no scene clock; deferring {delay:?} on a thread");
            ThreadTimer.schedule(delay, task);
        }
    }
}
