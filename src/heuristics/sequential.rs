// src/heuristics/sequential.rs

use std::collections::VecDeque;

use crate::graph::TaskGraph;
use crate::schedule::{Placement, Schedule};

/// Schedule every task back-to-back on processor 0 in Kahn order.
///
/// With one processor every topological order is optimal and the finish
/// time is the sum of all durations.
pub fn sequential_schedule(graph: &TaskGraph) -> Schedule {
    let n = graph.number_of_tasks();
    let mut in_degree: Vec<usize> = graph.tasks().map(|t| graph.parents(t).len()).collect();
    let mut ready: VecDeque<usize> = graph.tasks().filter(|&t| in_degree[t] == 0).collect();
    let mut placements = vec![
        Placement {
            start: 0,
            processor: 0
        };
        n
    ];
    let mut clock = 0;

    while let Some(task) = ready.pop_front() {
        placements[task].start = clock;
        clock += graph.duration(task);

        for &child in graph.children(task) {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.push_back(child);
            }
        }
    }

    Schedule {
        placements,
        finish_time: clock,
        processors: 1,
    }
}
