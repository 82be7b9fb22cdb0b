#![allow(dead_code)]

use std::sync::Arc;

use dagsched::graph::TaskGraph;
use dagsched::schedule::Schedule;
use dagsched::search::{SearchEngine, SearchMonitor, solve};
use dagsched::types::ExecutionStrategy;

pub use dagsched_test_utils::init_tracing;

pub const STRATEGIES: [ExecutionStrategy; 2] = [
    ExecutionStrategy::Sequential,
    ExecutionStrategy::Parallel { threads: 3 },
];

/// Solve and assert the result is an executable schedule.
pub fn solve_checked(graph: &TaskGraph, processors: usize, strategy: ExecutionStrategy) -> Schedule {
    let monitor = Arc::new(SearchMonitor::new());
    let schedule = solve(graph, processors, strategy, monitor).expect("search should succeed");
    if let Err(violation) = schedule.validate(graph) {
        panic!("invalid schedule ({strategy:?}, {processors} processors): {violation}");
    }
    schedule
}

/// Run the engine alone from a trivial bound, without the greedy seed.
pub fn search_unseeded(graph: &TaskGraph, processors: usize, strategy: ExecutionStrategy) -> Schedule {
    let engine = SearchEngine::new(graph, processors, strategy).expect("valid engine settings");
    let schedule = engine
        .search(graph.total_duration() + 1)
        .expect("search should succeed")
        .expect("a single-processor schedule always beats the bound");
    if let Err(violation) = schedule.validate(graph) {
        panic!("invalid schedule ({strategy:?}, {processors} processors): {violation}");
    }
    schedule
}
