// src/search/monitor.rs

//! Passive progress channel between a running search and its observers.
//!
//! The search writes, observers only read. The one exception is
//! [`SearchMonitor::cancel`], which asks the engine to stop at the next
//! explored state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::schedule::Schedule;
use crate::types::Time;

const NO_BEST: u64 = u64::MAX;

#[derive(Debug)]
pub struct SearchMonitor {
    states_explored: AtomicU64,
    best_finish: AtomicU64,
    best: Mutex<Option<Schedule>>,
    best_changed: AtomicBool,
    finished: AtomicBool,
    cancelled: AtomicBool,
}

/// Point-in-time copy of the monitor counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub states_explored: u64,
    pub best_finish_time: Option<Time>,
    pub finished: bool,
}

impl Default for SearchMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchMonitor {
    pub fn new() -> Self {
        Self {
            states_explored: AtomicU64::new(0),
            best_finish: AtomicU64::new(NO_BEST),
            best: Mutex::new(None),
            best_changed: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Number of search states expanded so far. Never decreases.
    pub fn states_explored(&self) -> u64 {
        self.states_explored.load(Ordering::Relaxed)
    }

    /// Finish time of the best schedule published so far. Never increases.
    pub fn best_finish_time(&self) -> Option<Time> {
        match self.best_finish.load(Ordering::Acquire) {
            NO_BEST => None,
            t => Some(t),
        }
    }

    pub fn best_schedule(&self) -> Option<Schedule> {
        self.best.lock().clone()
    }

    /// Returns `true` once per published improvement and resets the flag.
    pub fn take_best_changed(&self) -> bool {
        self.best_changed.swap(false, Ordering::AcqRel)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Ask the search to stop. The engine then returns
    /// [`SchedError::SearchAborted`](crate::errors::SchedError::SearchAborted).
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            states_explored: self.states_explored(),
            best_finish_time: self.best_finish_time(),
            finished: self.is_finished(),
        }
    }

    pub(crate) fn record_state(&self) {
        self.states_explored.fetch_add(1, Ordering::Relaxed);
    }

    /// Publish a new best schedule. Ignored unless it is strictly better than
    /// what is already published.
    pub(crate) fn publish_best(&self, schedule: &Schedule) {
        let mut best = self.best.lock();
        if best
            .as_ref()
            .is_some_and(|b| b.finish_time <= schedule.finish_time)
        {
            return;
        }
        *best = Some(schedule.clone());
        self.best_finish
            .store(schedule.finish_time, Ordering::Release);
        self.best_changed.store(true, Ordering::Release);
    }

    pub(crate) fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }
}
