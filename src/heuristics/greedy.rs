// src/heuristics/greedy.rs

use std::cmp::Reverse;

use tracing::debug;

use crate::graph::TaskGraph;
use crate::schedule::{Placement, Schedule};
use crate::types::{TaskId, Time};

/// Order in which the list scheduler pulls ready tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Tasks in the order they became ready.
    Fifo,
    BottomLevelDesc,
    BottomLevelAsc,
    DurationDesc,
    DurationAsc,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Fifo,
        Priority::BottomLevelDesc,
        Priority::BottomLevelAsc,
        Priority::DurationDesc,
        Priority::DurationAsc,
    ];

    /// Index into `ready` of the task to schedule next.
    fn pick(self, ready: &[TaskId], graph: &TaskGraph, bottom_levels: &[Time]) -> usize {
        let key = |t: TaskId| match self {
            Priority::Fifo => 0,
            Priority::BottomLevelDesc => bottom_levels[t] as i128,
            Priority::BottomLevelAsc => -(bottom_levels[t] as i128),
            Priority::DurationDesc => graph.duration(t) as i128,
            Priority::DurationAsc => -(graph.duration(t) as i128),
        };

        // Earlier entries win ties so FIFO degenerates to the queue head.
        ready
            .iter()
            .enumerate()
            .max_by_key(|&(idx, &t)| (key(t), Reverse(idx)))
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }
}

/// List-schedule the graph once under a single priority policy.
///
/// Each pulled task goes to the processor where it can start earliest
/// (lowest index on ties). `processors` must be at least 1.
pub fn list_schedule(
    graph: &TaskGraph,
    processors: usize,
    priority: Priority,
    bottom_levels: &[Time],
) -> Schedule {
    let n = graph.number_of_tasks();
    let mut in_degree: Vec<usize> = graph.tasks().map(|t| graph.parents(t).len()).collect();
    let mut ready: Vec<TaskId> = graph.tasks().filter(|&t| in_degree[t] == 0).collect();
    let mut placements = vec![
        Placement {
            start: 0,
            processor: 0
        };
        n
    ];
    let mut processor_finish: Vec<Time> = vec![0; processors];

    while !ready.is_empty() {
        let task = ready.remove(priority.pick(&ready, graph, bottom_levels));

        let mut best: Option<Placement> = None;
        for (processor, &free_at) in processor_finish.iter().enumerate() {
            let data_ready = graph
                .in_edges(task)
                .iter()
                .map(|edge| {
                    let parent = placements[edge.task];
                    let finish = parent.start + graph.duration(edge.task);
                    if parent.processor == processor {
                        finish
                    } else {
                        finish + edge.cost
                    }
                })
                .max()
                .unwrap_or(0);
            let start = free_at.max(data_ready);
            if best.is_none_or(|b| start < b.start) {
                best = Some(Placement { start, processor });
            }
        }

        let Some(chosen) = best else {
            break;
        };
        placements[task] = chosen;
        processor_finish[chosen.processor] = chosen.start + graph.duration(task);

        for &child in graph.children(task) {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.push(child);
            }
        }
    }

    Schedule::from_placements(graph, placements, processors)
}

/// Run every [`Priority`] policy and keep the shortest schedule.
///
/// Ties keep the earlier policy in [`Priority::ALL`].
pub fn greedy_schedule(graph: &TaskGraph, processors: usize, bottom_levels: &[Time]) -> Schedule {
    let mut best: Option<Schedule> = None;

    for priority in Priority::ALL {
        let schedule = list_schedule(graph, processors, priority, bottom_levels);
        debug!(
            ?priority,
            finish_time = schedule.finish_time,
            "greedy candidate"
        );
        if best
            .as_ref()
            .is_none_or(|b| schedule.finish_time < b.finish_time)
        {
            best = Some(schedule);
        }
    }

    best.unwrap_or_else(|| Schedule::empty(processors))
}
