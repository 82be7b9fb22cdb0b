#![allow(dead_code)]

use std::collections::HashMap;

use dagsched::graph::{TaskGraph, TaskGraphBuilder};
use dagsched::types::Time;

/// Name-based builder for `TaskGraph` to simplify test setup.
///
/// ```ignore
/// let graph = GraphBuilder::new()
///     .task("a", 2)
///     .task("b", 3)
///     .edge("a", "b", 1)
///     .build();
/// ```
pub struct GraphBuilder {
    inner: TaskGraphBuilder,
    ids: HashMap<String, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            inner: TaskGraphBuilder::new(),
            ids: HashMap::new(),
        }
    }

    pub fn task(mut self, name: &str, duration: Time) -> Self {
        let id = self.inner.add_task(name, duration);
        self.ids.insert(name.to_string(), id);
        self
    }

    pub fn edge(mut self, parent: &str, child: &str, cost: Time) -> Self {
        let p = *self.ids.get(parent).expect("edge parent must be declared first");
        let c = *self.ids.get(child).expect("edge child must be declared first");
        self.inner.add_edge(p, c, cost);
        self
    }

    pub fn build(self) -> TaskGraph {
        self.inner
            .build()
            .expect("Failed to build valid task graph from builder")
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `t0 -> t1 -> ... -> t{k-1}`; `costs[i]` is the cost of the edge leaving `t{i}`.
pub fn chain(durations: &[Time], costs: &[Time]) -> TaskGraph {
    let mut builder = TaskGraphBuilder::new();
    for (i, &d) in durations.iter().enumerate() {
        builder.add_task(format!("t{i}"), d);
    }
    for i in 1..durations.len() {
        builder.add_edge(i - 1, i, costs.get(i - 1).copied().unwrap_or(0));
    }
    builder.build().expect("chain is acyclic")
}

/// Tasks with no edges at all.
pub fn independent(durations: &[Time]) -> TaskGraph {
    let mut builder = TaskGraphBuilder::new();
    for (i, &d) in durations.iter().enumerate() {
        builder.add_task(format!("t{i}"), d);
    }
    builder.build().expect("no edges, no cycles")
}

/// `src -> w_i -> sink` for every width entry `(duration, cost_in, cost_out)`.
pub fn fork_join(
    source: Time,
    workers: &[(Time, Time, Time)],
    sink: Time,
) -> TaskGraph {
    let mut builder = TaskGraphBuilder::new();
    let src = builder.add_task("src", source);
    let ids: Vec<usize> = workers
        .iter()
        .enumerate()
        .map(|(i, &(d, _, _))| builder.add_task(format!("w{i}"), d))
        .collect();
    let snk = builder.add_task("sink", sink);
    for (&id, &(_, cost_in, cost_out)) in ids.iter().zip(workers) {
        builder.add_edge(src, id, cost_in);
        builder.add_edge(id, snk, cost_out);
    }
    builder.build().expect("fork-join is acyclic")
}

/// Build a graph from plain vectors: `durations[i]` and `(parent, child, cost)`.
pub fn from_edges(durations: &[Time], edges: &[(usize, usize, Time)]) -> TaskGraph {
    let mut builder = TaskGraphBuilder::new();
    for (i, &d) in durations.iter().enumerate() {
        builder.add_task(format!("t{i}"), d);
    }
    for &(p, c, cost) in edges {
        builder.add_edge(p, c, cost);
    }
    builder.build().expect("edges must describe a DAG")
}
