//! Cooperative periodic scheduler
//!
//! One thread calls [`Scheduler::tick`] in a loop. Each tick reads the clock
//! once and fires, in registration order, every task whose due time has
//! passed. Tasks run to completion; a slow task delays everything behind it.
//!
//! ## Timing
//!
//! Due times are absolute. After a task fires at due time `d`, its next due
//! time is `d + period`, not `now + period`, so late ticks do not push the
//! schedule back:
//!
//! ```text
//! period = 1000, ticks land late by jitter j
//! due:    1000   2000   3000   4000
//! fired:  1003   2011   3001   4020     (next due never includes j)
//! ```
//!
//! When a stall leaves a task more than a full period behind, the missed
//! slots are skipped rather than replayed: the next due time moves forward
//! along the same `start + k·period` grid to the first slot after `now`.
//! Skipped slots are counted as overruns.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::errors::SchedulerError;
use crate::time::{TimeSource, Timestamp};

/// Handle returned by registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u32);

/// Periodic unit of work
///
/// The period is read after every firing, so a task whose period is a live
/// parameter picks up changes on its next cycle.
pub trait Task {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Current period in milliseconds
    fn period_ms(&self) -> u64;

    /// Do the work for the slot due at or before `now`
    fn run(&mut self, now: Timestamp);
}

/// Task built from a closure and a fixed period
struct FnTask<F> {
    name: &'static str,
    period_ms: u64,
    body: F,
}

impl<F: FnMut(Timestamp)> Task for FnTask<F> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn period_ms(&self) -> u64 {
        self.period_ms
    }

    fn run(&mut self, now: Timestamp) {
        (self.body)(now)
    }
}

/// Per-task counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    /// Times the task has fired
    pub runs: u64,
    /// Due slots skipped after stalls
    pub overruns: u64,
    /// Absolute time of the next firing
    pub next_due: Timestamp,
}

struct Slot {
    id: TaskId,
    task: Box<dyn Task>,
    stats: TaskStats,
}

/// Single-threaded cooperative scheduler
pub struct Scheduler {
    clock: Box<dyn TimeSource>,
    slots: Vec<Slot>,
    next_id: u32,
    ticks: u64,
}

impl Scheduler {
    /// Scheduler driven by `clock`
    pub fn new(clock: impl TimeSource + 'static) -> Self {
        Self { clock: Box::new(clock), slots: Vec::new(), next_id: 0, ticks: 0 }
    }

    /// Current clock reading
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Register a task; it first fires one period from now
    pub fn register(&mut self, task: impl Task + 'static) -> Result<TaskId, SchedulerError> {
        let period = task.period_ms();
        if period == 0 {
            return Err(SchedulerError::ZeroPeriod { name: task.name() });
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let next_due = self.clock.now().saturating_add(period);
        log_debug!("scheduled '{}' every {} ms, first at {}", task.name(), period, next_due);

        self.slots.push(Slot {
            id,
            task: Box::new(task),
            stats: TaskStats { next_due, ..TaskStats::default() },
        });
        Ok(id)
    }

    /// Register a closure to run every `period_ms`
    pub fn every<F>(
        &mut self,
        period_ms: u64,
        name: &'static str,
        body: F,
    ) -> Result<TaskId, SchedulerError>
    where
        F: FnMut(Timestamp) + 'static,
    {
        self.register(FnTask { name, period_ms, body })
    }

    /// Fire every due task once, in registration order
    ///
    /// Returns how many tasks fired. Never blocks.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.ticks += 1;

        let mut fired = 0;
        for slot in &mut self.slots {
            if now < slot.stats.next_due {
                continue;
            }

            slot.task.run(now);
            slot.stats.runs += 1;
            fired += 1;

            // Period may have been reconfigured during the run
            let period = slot.task.period_ms().max(1);
            let mut next_due = slot.stats.next_due.saturating_add(period);
            if next_due <= now {
                let missed = (now - next_due) / period + 1;
                next_due = next_due.saturating_add(missed * period);
                slot.stats.overruns += missed;
                log_warn!(
                    "task '{}' fell behind, skipped {} slot(s)",
                    slot.task.name(),
                    missed
                );
            }
            slot.stats.next_due = next_due;
        }
        fired
    }

    /// Tick until `stop` returns true
    ///
    /// `stop` is checked before every tick.
    pub fn run_until(&mut self, mut stop: impl FnMut() -> bool) {
        while !stop() {
            self.tick();
            core::hint::spin_loop();
        }
    }

    /// Counters for a registered task
    pub fn stats(&self, id: TaskId) -> Option<TaskStats> {
        self.slots.iter().find(|slot| slot.id == id).map(|slot| slot.stats)
    }

    /// Registered task count
    pub fn task_count(&self) -> usize {
        self.slots.len()
    }

    /// Ticks executed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
