// src/graph/preprocess.rs

//! Per-graph data computed once before the search starts.

use tracing::debug;

use crate::graph::TaskGraph;
use crate::types::{TaskId, Time};

/// Bottom level of every task: the longest duration-weighted path from the
/// task to any sink, counting the task itself.
///
/// `bottom_level(t) = duration(t) + max(bottom_level(c) for c in children(t))`,
/// or `duration(t)` for a sink. Communication costs are not included, so the
/// value is a valid lower bound on the time still needed once `t` starts.
pub fn bottom_levels(graph: &TaskGraph) -> Vec<Time> {
    let mut levels = vec![0; graph.number_of_tasks()];

    // Reverse topological order visits every child before its parents.
    for &task in graph.topological_order().iter().rev() {
        let below = graph
            .children(task)
            .iter()
            .map(|&child| levels[child])
            .max()
            .unwrap_or(0);
        levels[task] = graph.duration(task) + below;
    }

    levels
}

/// Partition of tasks into structurally identical groups.
///
/// Two tasks are equivalent when they have the same duration, the same
/// parents with the same incoming costs and the same children with the same
/// outgoing costs. Scheduling equivalent tasks in a different relative order
/// produces isomorphic schedules, so the search only tries one per class at
/// each decision point.
#[derive(Debug, Clone)]
pub struct EquivalenceClasses {
    class_of: Vec<usize>,
    classes: Vec<Vec<TaskId>>,
}

impl EquivalenceClasses {
    pub fn compute(graph: &TaskGraph) -> Self {
        let n = graph.number_of_tasks();
        let signatures: Vec<Signature> = graph.tasks().map(|t| Signature::of(graph, t)).collect();

        let mut class_of = vec![usize::MAX; n];
        let mut classes: Vec<Vec<TaskId>> = Vec::new();

        for task in 0..n {
            if class_of[task] != usize::MAX {
                continue;
            }
            let id = classes.len();
            let mut members = vec![task];
            class_of[task] = id;

            for other in (task + 1)..n {
                if class_of[other] == usize::MAX && signatures[task] == signatures[other] {
                    class_of[other] = id;
                    members.push(other);
                }
            }
            classes.push(members);
        }

        debug!(
            tasks = n,
            classes = classes.len(),
            "computed task equivalence classes"
        );

        Self { class_of, classes }
    }

    /// Class index of a task.
    pub fn class_of(&self, task: TaskId) -> usize {
        self.class_of[task]
    }

    /// All tasks equivalent to `task`, including itself, in ascending order.
    pub fn members(&self, task: TaskId) -> &[TaskId] {
        &self.classes[self.class_of[task]]
    }

    pub fn are_equivalent(&self, a: TaskId, b: TaskId) -> bool {
        self.class_of[a] == self.class_of[b]
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[TaskId]> {
        self.classes.iter().map(Vec::as_slice)
    }
}

/// Sorted structural description of a task used for equivalence tests.
#[derive(Debug, PartialEq, Eq)]
struct Signature {
    duration: Time,
    parents: Vec<(TaskId, Time)>,
    children: Vec<(TaskId, Time)>,
}

impl Signature {
    fn of(graph: &TaskGraph, task: TaskId) -> Self {
        let mut parents: Vec<(TaskId, Time)> = graph
            .in_edges(task)
            .iter()
            .map(|e| (e.task, e.cost))
            .collect();
        parents.sort_unstable();

        let mut children: Vec<(TaskId, Time)> = graph
            .out_edges(task)
            .iter()
            .map(|e| (e.task, e.cost))
            .collect();
        children.sort_unstable();

        Self {
            duration: graph.duration(task),
            parents,
            children,
        }
    }
}

/// Everything the search needs from preprocessing, bundled.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub bottom_levels: Vec<Time>,
    pub equivalence: EquivalenceClasses,
}

impl Preprocessed {
    pub fn compute(graph: &TaskGraph) -> Self {
        Self {
            bottom_levels: bottom_levels(graph),
            equivalence: EquivalenceClasses::compute(graph),
        }
    }
}
