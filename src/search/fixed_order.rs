// src/search/fixed_order.rs

//! Fixed task order fast path.
//!
//! The ready tasks qualify when each has at most one parent and one child,
//! either all of them feed the same child or none has a child, and all of
//! their parents sit on the same processor. Some optimal completion then
//! schedules them in ascending data-ready time, ties broken by descending
//! out-edge cost, provided the out-edge costs along that order are
//! non-increasing. That is checked before the order is used. The search
//! then only branches over the processor of the head task.
//!
//! A mix of tasks with and without the shared child does not qualify: the
//! tie-break could then push the child's parent behind an unrelated task.

use crate::graph::TaskGraph;
use crate::search::engine::{Continuation, Search};
use crate::search::state::SearchState;
use crate::types::{ProcessorId, TaskId, Time};

/// Return the fixed order of the current candidates, if one exists.
pub fn fixed_task_order(graph: &TaskGraph, state: &SearchState) -> Option<Vec<TaskId>> {
    let candidates = state.candidates();
    if candidates.is_empty() {
        return None;
    }

    let mut shared_child: Option<TaskId> = None;
    let mut with_child = 0usize;
    let mut parent_processor: Option<ProcessorId> = None;

    for &task in candidates {
        if graph.parents(task).len() > 1 || graph.children(task).len() > 1 {
            return None;
        }

        if let Some(&child) = graph.children(task).first() {
            with_child += 1;
            match shared_child {
                None => shared_child = Some(child),
                Some(c) if c != child => return None,
                Some(_) => {}
            }
        }

        if let Some(&parent) = graph.parents(task).first() {
            let processor = state.placement(parent)?.processor;
            match parent_processor {
                None => parent_processor = Some(processor),
                Some(p) if p != processor => return None,
                Some(_) => {}
            }
        }
    }

    if with_child != 0 && with_child != candidates.len() {
        return None;
    }

    let data_ready = |task: TaskId| -> Time {
        graph
            .in_edges(task)
            .first()
            .and_then(|edge| {
                state
                    .placement(edge.task)
                    .map(|p| p.start + graph.duration(edge.task) + edge.cost)
            })
            .unwrap_or(0)
    };
    let out_cost = |task: TaskId| -> Time { graph.out_edges(task).first().map_or(0, |e| e.cost) };

    let mut order = candidates.to_vec();
    order.sort_by(|&a, &b| {
        data_ready(a)
            .cmp(&data_ready(b))
            .then_with(|| out_cost(b).cmp(&out_cost(a)))
            .then_with(|| a.cmp(&b))
    });

    if order.windows(2).all(|w| out_cost(w[0]) >= out_cost(w[1])) {
        Some(order)
    } else {
        None
    }
}

impl Search<'_> {
    /// Entry point for states whose candidates are already in fixed order.
    pub(crate) fn explore_fixed_order(&self, state: &mut SearchState) {
        if !self.enter(state) {
            return;
        }
        self.branch_fixed_order(state);
    }

    /// Schedule the head of the fixed order on each useful processor.
    pub(crate) fn branch_fixed_order(&self, state: &mut SearchState) {
        let Some(&head) = state.candidates().first() else {
            return;
        };
        if self.bounds(state).prunes(self.incumbent.bound()) {
            return;
        }

        let release = state.release(self.graph, head);
        let next = if release.freed() > 0 {
            Continuation::General
        } else {
            Continuation::FixedOrder
        };
        let forks = self.place_on_processors(state, head, next);
        state.restore(self.graph, head, release);
        self.run_forks(forks);
    }
}
