//! Proptest strategies for random task graphs.

use dagsched::graph::{TaskGraph, TaskGraphBuilder};
use dagsched::types::Time;
use proptest::prelude::*;

/// Random DAG with `1..=max_tasks` tasks.
///
/// Acyclicity is guaranteed by only drawing edges from lower to higher ids.
/// Durations are in `1..=5`, communication costs in `0..=4`.
pub fn small_dag(max_tasks: usize) -> impl Strategy<Value = TaskGraph> {
    forward_dag(max_tasks, 1)
}

/// Like [`small_dag`] but durations start at 0.
pub fn small_dag_with_zero_durations(max_tasks: usize) -> impl Strategy<Value = TaskGraph> {
    forward_dag(max_tasks, 0)
}

fn forward_dag(max_tasks: usize, min_duration: Time) -> impl Strategy<Value = TaskGraph> {
    (1..=max_tasks).prop_flat_map(move |n| {
        let pairs = n * n.saturating_sub(1) / 2;
        (
            proptest::collection::vec(min_duration..=5, n),
            proptest::collection::vec((proptest::bool::weighted(0.35), 0u64..=4), pairs),
        )
            .prop_map(move |(durations, edges)| {
                let mut builder = TaskGraphBuilder::new();
                for (i, d) in durations.into_iter().enumerate() {
                    builder.add_task(format!("t{i}"), d);
                }
                let mut k = 0;
                for child in 0..n {
                    for parent in 0..child {
                        let (present, cost) = edges[k];
                        k += 1;
                        if present {
                            builder.add_edge(parent, child, cost);
                        }
                    }
                }
                builder.build().expect("forward edges only")
            })
    })
}

/// Random in-forest: every task has at most one child, so ready sets mix
/// tasks that feed a shared child with tasks that feed nothing.
///
/// Durations are in `0..=5`, communication costs in `0..=3`.
pub fn in_forest(max_tasks: usize) -> impl Strategy<Value = TaskGraph> {
    (1..=max_tasks).prop_flat_map(|n| {
        proptest::collection::vec(
            (0u64..=5, proptest::bool::weighted(0.6), any::<usize>(), 0u64..=3),
            n,
        )
        .prop_map(move |tasks| {
            let mut builder = TaskGraphBuilder::new();
            for (i, &(duration, ..)) in tasks.iter().enumerate() {
                builder.add_task(format!("t{i}"), duration);
            }
            for (i, &(_, has_child, pick, cost)) in tasks.iter().enumerate() {
                let later = n - i - 1;
                if has_child && later > 0 {
                    builder.add_edge(i, i + 1 + pick % later, cost);
                }
            }
            builder.build().expect("edges point to later tasks only")
        })
    })
}
