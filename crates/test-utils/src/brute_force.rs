//! Exhaustive reference solver for small graphs.
//!
//! Enumerates every order in which ready tasks can be appended to every
//! processor, starting each task as early as its processor and inputs allow.
//! Some optimal schedule is always reachable this way, so the minimum over
//! all leaves is the true optimum.

use dagsched::graph::TaskGraph;
use dagsched::types::Time;

struct Walk<'a> {
    graph: &'a TaskGraph,
    in_degree: Vec<usize>,
    placed: Vec<Option<(Time, usize)>>,
    processor_finish: Vec<Time>,
    used: Vec<bool>,
    best: Time,
}

/// Optimal makespan of `graph` on `processors` processors.
pub fn optimal_finish_time(graph: &TaskGraph, processors: usize) -> Time {
    assert!(processors >= 1, "need at least one processor");
    let mut walk = Walk {
        graph,
        in_degree: graph.tasks().map(|t| graph.parents(t).len()).collect(),
        placed: vec![None; graph.number_of_tasks()],
        processor_finish: vec![0; processors],
        used: vec![false; processors],
        best: Time::MAX,
    };
    walk.visit(0);
    walk.best
}

impl Walk<'_> {
    fn visit(&mut self, scheduled: usize) {
        let latest = self.processor_finish.iter().copied().max().unwrap_or(0);
        if scheduled == self.graph.number_of_tasks() {
            self.best = self.best.min(latest);
            return;
        }
        if latest >= self.best {
            return;
        }

        let ready: Vec<usize> = self
            .graph
            .tasks()
            .filter(|&t| self.placed[t].is_none() && self.in_degree[t] == 0)
            .collect();

        for task in ready {
            let mut empty_seen = false;
            for p in 0..self.processor_finish.len() {
                if !self.used[p] {
                    if empty_seen {
                        continue;
                    }
                    empty_seen = true;
                }

                let mut start = self.processor_finish[p];
                for edge in self.graph.in_edges(task) {
                    let (ps, pp) = self.placed[edge.task].expect("parents are placed");
                    let mut arrival = ps + self.graph.duration(edge.task);
                    if pp != p {
                        arrival += edge.cost;
                    }
                    start = start.max(arrival);
                }

                let prev_finish = self.processor_finish[p];
                let prev_used = self.used[p];
                self.placed[task] = Some((start, p));
                self.processor_finish[p] = start + self.graph.duration(task);
                self.used[p] = true;
                for &c in self.graph.children(task) {
                    self.in_degree[c] -= 1;
                }

                self.visit(scheduled + 1);

                for &c in self.graph.children(task) {
                    self.in_degree[c] += 1;
                }
                self.used[p] = prev_used;
                self.processor_finish[p] = prev_finish;
                self.placed[task] = None;
            }
        }
    }
}
