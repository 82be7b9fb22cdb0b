// src/graph/task_graph.rs

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::errors::{Result, SchedError};
use crate::types::{TaskId, Time};

/// A dependency edge as seen from one endpoint: the task on the other side
/// plus the communication cost paid when both ends run on different
/// processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub task: TaskId,
    pub cost: Time,
}

/// Internal node structure: stores duration and immediate neighbours.
#[derive(Debug, Clone)]
struct TaskNode {
    name: String,
    duration: Time,
    parents: Vec<TaskId>,
    children: Vec<TaskId>,
    in_edges: Vec<Edge>,
    out_edges: Vec<Edge>,
}

/// Immutable task graph with dense task ids.
///
/// Construction goes through [`TaskGraphBuilder`], which rejects self loops,
/// duplicate edges and cycles, so the search can assume a DAG.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: Vec<TaskNode>,
    costs: HashMap<(TaskId, TaskId), Time>,
    topo_order: Vec<TaskId>,
}

impl TaskGraph {
    pub fn number_of_tasks(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All task ids in ascending order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        0..self.nodes.len()
    }

    pub fn name(&self, task: TaskId) -> &str {
        &self.nodes[task].name
    }

    pub fn duration(&self, task: TaskId) -> Time {
        self.nodes[task].duration
    }

    /// Immediate parents, in the order their edges were added.
    pub fn parents(&self, task: TaskId) -> &[TaskId] {
        &self.nodes[task].parents
    }

    /// Immediate children, in the order their edges were added.
    pub fn children(&self, task: TaskId) -> &[TaskId] {
        &self.nodes[task].children
    }

    /// Parents together with the cost of each incoming edge.
    pub fn in_edges(&self, task: TaskId) -> &[Edge] {
        &self.nodes[task].in_edges
    }

    /// Children together with the cost of each outgoing edge.
    pub fn out_edges(&self, task: TaskId) -> &[Edge] {
        &self.nodes[task].out_edges
    }

    /// Communication cost of the edge `parent -> child`, or 0 when there is none.
    pub fn comm_cost(&self, parent: TaskId, child: TaskId) -> Time {
        self.costs.get(&(parent, child)).copied().unwrap_or(0)
    }

    pub fn has_edge(&self, parent: TaskId, child: TaskId) -> bool {
        self.costs.contains_key(&(parent, child))
    }

    pub fn edge_count(&self) -> usize {
        self.costs.len()
    }

    /// Sum of all task durations (the one-processor makespan).
    pub fn total_duration(&self) -> Time {
        self.nodes.iter().map(|n| n.duration).sum()
    }

    /// A topological order computed once at construction.
    pub fn topological_order(&self) -> &[TaskId] {
        &self.topo_order
    }

    /// Look up a task id by name.
    pub fn find(&self, name: &str) -> Option<TaskId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// All edges as `(parent, child, cost)`, ordered by parent then insertion.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, TaskId, Time)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(parent, node)| {
            node.out_edges
                .iter()
                .map(move |edge| (parent, edge.task, edge.cost))
        })
    }
}

/// Incremental builder for a [`TaskGraph`].
#[derive(Debug, Default)]
pub struct TaskGraphBuilder {
    names: Vec<String>,
    durations: Vec<Time>,
    edges: Vec<(TaskId, TaskId, Time)>,
}

impl TaskGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task and return its id. Ids are assigned in insertion order.
    pub fn add_task(&mut self, name: impl Into<String>, duration: Time) -> TaskId {
        self.names.push(name.into());
        self.durations.push(duration);
        self.names.len() - 1
    }

    /// Add a dependency `parent -> child` with the given communication cost.
    pub fn add_edge(&mut self, parent: TaskId, child: TaskId, cost: Time) -> &mut Self {
        self.edges.push((parent, child, cost));
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Validate and freeze the graph.
    ///
    /// Fails on duplicate task names, edges to unknown tasks, self loops,
    /// duplicate edges and cycles.
    pub fn build(self) -> Result<TaskGraph> {
        let n = self.names.len();

        let mut seen_names = HashSet::with_capacity(n);
        for name in &self.names {
            if !seen_names.insert(name.as_str()) {
                return Err(SchedError::InvalidGraph(format!(
                    "duplicate task name '{name}'"
                )));
            }
        }

        let mut nodes: Vec<TaskNode> = self
            .names
            .into_iter()
            .zip(self.durations)
            .map(|(name, duration)| TaskNode {
                name,
                duration,
                parents: Vec::new(),
                children: Vec::new(),
                in_edges: Vec::new(),
                out_edges: Vec::new(),
            })
            .collect();

        let mut costs = HashMap::with_capacity(self.edges.len());
        let mut graph: DiGraph<TaskId, Time> = DiGraph::with_capacity(n, self.edges.len());
        let indices: Vec<NodeIndex> = (0..n).map(|t| graph.add_node(t)).collect();

        for (parent, child, cost) in self.edges {
            if parent >= n || child >= n {
                return Err(SchedError::InvalidGraph(format!(
                    "edge {parent} -> {child} references an unknown task (have {n} tasks)"
                )));
            }
            if parent == child {
                return Err(SchedError::InvalidGraph(format!(
                    "task '{}' cannot depend on itself",
                    nodes[parent].name
                )));
            }
            if costs.insert((parent, child), cost).is_some() {
                return Err(SchedError::InvalidGraph(format!(
                    "duplicate edge '{}' -> '{}'",
                    nodes[parent].name, nodes[child].name
                )));
            }

            graph.add_edge(indices[parent], indices[child], cost);
            nodes[parent].children.push(child);
            nodes[parent].out_edges.push(Edge { task: child, cost });
            nodes[child].parents.push(parent);
            nodes[child].in_edges.push(Edge { task: parent, cost });
        }

        // A topological sort will fail if there is a cycle.
        let topo_order = match toposort(&graph, None) {
            Ok(order) => order.into_iter().map(|ix| graph[ix]).collect(),
            Err(cycle) => {
                let task = graph[cycle.node_id()];
                return Err(SchedError::DagCycle(format!(
                    "cycle detected in task graph involving task '{}'",
                    nodes[task].name
                )));
            }
        };

        Ok(TaskGraph {
            nodes,
            costs,
            topo_order,
        })
    }
}
