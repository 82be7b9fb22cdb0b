// src/search/mod.rs

//! Optimal schedule search.
//!
//! Layout:
//! - `state`: the mutable partial schedule and its apply/undo pairs.
//! - `fingerprint`: processor-order-independent state identity and the
//!   visited set built from it.
//! - `incumbent`: best complete schedule shared across branches.
//! - `monitor`: read-only progress view plus cooperative cancellation.
//! - `engine`: the branch-and-bound recursion, sequential or on rayon.
//! - `fixed_order`: the fixed task order fast path.

pub mod engine;
pub mod fingerprint;
pub mod fixed_order;
pub mod incumbent;
pub mod monitor;
pub mod state;

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, SchedError};
use crate::graph::TaskGraph;
use crate::heuristics::{greedy_schedule, sequential_schedule};
use crate::schedule::Schedule;
use crate::types::ExecutionStrategy;

pub use engine::SearchEngine;
pub use fingerprint::{Fingerprint, VisitedSet};
pub use fixed_order::fixed_task_order;
pub use incumbent::Incumbent;
pub use monitor::{MonitorSnapshot, SearchMonitor};
pub use state::{DataReady, Release, SearchState};

/// Compute an optimal schedule of `graph` on `processors` processors.
///
/// One processor needs no search. Otherwise the best greedy schedule seeds
/// the search and is returned unchanged when nothing beats it.
pub fn solve(
    graph: &TaskGraph,
    processors: usize,
    strategy: ExecutionStrategy,
    monitor: Arc<SearchMonitor>,
) -> Result<Schedule> {
    match processors {
        0 => Err(SchedError::InvalidProcessorCount(0)),
        1 => {
            let schedule = sequential_schedule(graph);
            info!(
                finish_time = schedule.finish_time,
                "single processor: topological order is optimal"
            );
            monitor.publish_best(&schedule);
            monitor.mark_finished();
            Ok(schedule)
        }
        _ => {
            let engine = SearchEngine::new(graph, processors, strategy)?.with_monitor(monitor);
            let initial = greedy_schedule(graph, processors, &engine.preprocessed().bottom_levels);
            info!(finish_time = initial.finish_time, "greedy upper bound");
            engine.improve(initial)
        }
    }
}
