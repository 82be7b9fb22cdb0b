// src/search/state.rs

//! Mutable partial schedule walked by the branch-and-bound search.
//!
//! Every mutation comes as a pair: [`SearchState::release`] /
//! [`SearchState::restore`] for taking a task out of the ready set, and
//! [`SearchState::place`] / [`SearchState::unplace`] for assigning it to a
//! processor. The sequential engine brackets each recursive call with one
//! pair; the parallel engine clones the state after `place` instead.

use crate::graph::TaskGraph;
use crate::schedule::{Placement, Schedule};
use crate::types::{ProcessorId, TaskId, Time};

#[derive(Debug, Clone)]
pub struct SearchState {
    /// Unscheduled tasks whose parents are all scheduled.
    candidates: Vec<TaskId>,
    /// Unscheduled parents left per task.
    in_degree: Vec<usize>,
    assignment: Vec<Option<Placement>>,
    processor_finish: Vec<Time>,
    /// Number of tasks placed per processor. Zero means idle.
    placed: Vec<usize>,
    remaining_duration: Time,
}

/// Undo record returned by [`SearchState::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    index: usize,
    freed: usize,
}

impl Release {
    /// Number of children that became ready.
    pub fn freed(&self) -> usize {
        self.freed
    }
}

/// Latest input arrival for a task, split so the cost saved by co-locating
/// with the dominant parent can be applied per processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataReady {
    max: Time,
    max_processor: Option<ProcessorId>,
    /// Latest arrival from parents not on `max_processor`.
    second: Time,
}

impl DataReady {
    /// Earliest instant all inputs are available on `processor`.
    pub fn on(&self, processor: ProcessorId) -> Time {
        if self.max_processor == Some(processor) {
            self.second
        } else {
            self.max
        }
    }
}

impl SearchState {
    /// Empty schedule: only source tasks are ready.
    pub fn new(graph: &TaskGraph, processors: usize) -> Self {
        let in_degree: Vec<usize> = graph.tasks().map(|t| graph.parents(t).len()).collect();
        let candidates = graph.tasks().filter(|&t| in_degree[t] == 0).collect();
        Self {
            candidates,
            in_degree,
            assignment: vec![None; graph.number_of_tasks()],
            processor_finish: vec![0; processors],
            placed: vec![0; processors],
            remaining_duration: graph.total_duration(),
        }
    }

    pub fn candidates(&self) -> &[TaskId] {
        &self.candidates
    }

    pub fn is_complete(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn remaining_duration(&self) -> Time {
        self.remaining_duration
    }

    pub fn processors(&self) -> usize {
        self.processor_finish.len()
    }

    pub fn processor_finish(&self, processor: ProcessorId) -> Time {
        self.processor_finish[processor]
    }

    /// `true` while no task has been placed on `processor`.
    pub fn is_idle(&self, processor: ProcessorId) -> bool {
        self.placed[processor] == 0
    }

    pub fn placement(&self, task: TaskId) -> Option<Placement> {
        self.assignment[task]
    }

    pub fn assignment(&self) -> &[Option<Placement>] {
        &self.assignment
    }

    pub fn earliest_finish(&self) -> Time {
        self.processor_finish.iter().copied().min().unwrap_or(0)
    }

    pub fn latest_finish(&self) -> Time {
        self.processor_finish.iter().copied().max().unwrap_or(0)
    }

    /// Swap the candidate list for a reordering of the same tasks and return
    /// the previous list.
    pub fn replace_candidates(&mut self, candidates: Vec<TaskId>) -> Vec<TaskId> {
        std::mem::replace(&mut self.candidates, candidates)
    }

    /// Take `task` out of the candidates and resolve its outgoing
    /// dependencies. Children that become ready are appended.
    ///
    /// `task` must currently be a candidate.
    pub fn release(&mut self, graph: &TaskGraph, task: TaskId) -> Release {
        let index = self
            .candidates
            .iter()
            .position(|&t| t == task)
            .unwrap_or(self.candidates.len());
        if index < self.candidates.len() {
            self.candidates.remove(index);
        }
        self.remaining_duration -= graph.duration(task);

        let mut freed = 0;
        for &child in graph.children(task) {
            self.in_degree[child] -= 1;
            if self.in_degree[child] == 0 {
                self.candidates.push(child);
                freed += 1;
            }
        }

        Release { index, freed }
    }

    /// Undo a [`release`](Self::release). Must be called with the candidate
    /// list in the state `release` left it in.
    pub fn restore(&mut self, graph: &TaskGraph, task: TaskId, release: Release) {
        let keep = self.candidates.len() - release.freed;
        self.candidates.truncate(keep);
        for &child in graph.children(task) {
            self.in_degree[child] += 1;
        }
        self.remaining_duration += graph.duration(task);
        let index = release.index.min(self.candidates.len());
        self.candidates.insert(index, task);
    }

    /// Input arrival times for a candidate whose parents are all placed.
    pub fn data_ready(&self, graph: &TaskGraph, task: TaskId) -> DataReady {
        let mut ready = DataReady::default();

        for edge in graph.in_edges(task) {
            let Some(parent) = self.assignment[edge.task] else {
                continue;
            };
            let arrival = parent.start + graph.duration(edge.task) + edge.cost;

            if ready.max_processor == Some(parent.processor) {
                ready.max = ready.max.max(arrival);
            } else if ready.max_processor.is_none() || arrival > ready.max {
                // Everything seen so far sits at or below the old maximum,
                // which lives on a processor other than the new one.
                ready.second = ready.max;
                ready.max = arrival;
                ready.max_processor = Some(parent.processor);
            } else {
                ready.second = ready.second.max(arrival);
            }
        }

        ready
    }

    /// Assign `task` and return the processor's previous finish time.
    pub fn place(
        &mut self,
        graph: &TaskGraph,
        task: TaskId,
        processor: ProcessorId,
        start: Time,
    ) -> Time {
        self.assignment[task] = Some(Placement { start, processor });
        self.placed[processor] += 1;
        let previous = self.processor_finish[processor];
        self.processor_finish[processor] = start + graph.duration(task);
        previous
    }

    pub fn unplace(&mut self, task: TaskId, processor: ProcessorId, previous_finish: Time) {
        self.assignment[task] = None;
        self.placed[processor] -= 1;
        self.processor_finish[processor] = previous_finish;
    }

    /// Freeze a complete state into a [`Schedule`]. Returns `None` while any
    /// task is still unplaced.
    pub fn to_schedule(&self) -> Option<Schedule> {
        let placements = self.assignment.iter().copied().collect::<Option<Vec<_>>>()?;
        Some(Schedule {
            placements,
            finish_time: self.latest_finish(),
            processors: self.processors(),
        })
    }
}
