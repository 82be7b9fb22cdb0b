// src/search/incumbent.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::schedule::Schedule;
use crate::search::monitor::SearchMonitor;
use crate::types::Time;

/// Best complete schedule found so far, shared by every branch of a search.
///
/// The bound is mirrored in an atomic so pruning can read it without
/// locking. Improvements take the lock and re-check, so two workers can
/// never both install a schedule with the same finish time.
#[derive(Debug)]
pub struct Incumbent {
    bound: AtomicU64,
    best: Mutex<Option<Schedule>>,
    monitor: Arc<SearchMonitor>,
}

impl Incumbent {
    /// Start from a bare upper bound with no schedule attached.
    pub fn with_bound(bound: Time, monitor: Arc<SearchMonitor>) -> Self {
        Self {
            bound: AtomicU64::new(bound),
            best: Mutex::new(None),
            monitor,
        }
    }

    /// Start from a known feasible schedule.
    pub fn with_schedule(schedule: Schedule, monitor: Arc<SearchMonitor>) -> Self {
        monitor.publish_best(&schedule);
        Self {
            bound: AtomicU64::new(schedule.finish_time),
            best: Mutex::new(Some(schedule)),
            monitor,
        }
    }

    /// Current upper bound. Only ever decreases.
    pub fn bound(&self) -> Time {
        self.bound.load(Ordering::Acquire)
    }

    /// Offer a complete schedule finishing at `finish`.
    ///
    /// `build` is only invoked when `finish` beats the current bound.
    /// Returns whether the incumbent was replaced.
    pub fn offer<F>(&self, finish: Time, build: F) -> bool
    where
        F: FnOnce() -> Option<Schedule>,
    {
        if finish >= self.bound() {
            return false;
        }

        let mut best = self.best.lock();
        if finish >= self.bound() {
            return false;
        }
        let Some(schedule) = build() else {
            return false;
        };

        debug!(finish_time = finish, "new best schedule");
        self.monitor.publish_best(&schedule);
        self.bound.store(finish, Ordering::Release);
        *best = Some(schedule);
        true
    }

    pub fn into_best(self) -> Option<Schedule> {
        self.best.into_inner()
    }
}
