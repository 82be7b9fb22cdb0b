// src/schedule.rs

//! Complete schedules: where and when every task runs.

use std::fmt::Write as _;

use thiserror::Error;

use crate::graph::TaskGraph;
use crate::types::{ProcessorId, SummaryStyle, TaskId, Time};

/// Start time and processor assigned to one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub start: Time,
    pub processor: ProcessorId,
}

/// A full assignment of every task in a graph.
///
/// `placements[t]` belongs to task `t`; `finish_time` is the makespan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub placements: Vec<Placement>,
    pub finish_time: Time,
    pub processors: usize,
}

/// First problem found by [`Schedule::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    #[error("schedule has {actual} placements but the graph has {expected} tasks")]
    WrongLength { expected: usize, actual: usize },

    #[error("task {task} is placed on processor {processor} but only {processors} exist")]
    ProcessorOutOfRange {
        task: TaskId,
        processor: ProcessorId,
        processors: usize,
    },

    #[error("tasks {first} and {second} overlap on processor {processor}")]
    Overlap {
        processor: ProcessorId,
        first: TaskId,
        second: TaskId,
    },

    #[error("task {child} starts at {start} but its input from task {parent} is ready at {ready}")]
    Precedence {
        parent: TaskId,
        child: TaskId,
        ready: Time,
        start: Time,
    },

    #[error("reported finish time {reported} does not match the actual finish time {actual}")]
    FinishMismatch { reported: Time, actual: Time },
}

impl Schedule {
    /// Build a schedule and derive its finish time from the placements.
    pub fn from_placements(graph: &TaskGraph, placements: Vec<Placement>, processors: usize) -> Self {
        let finish_time = placements
            .iter()
            .enumerate()
            .map(|(task, p)| p.start + graph.duration(task))
            .max()
            .unwrap_or(0);
        Self {
            placements,
            finish_time,
            processors,
        }
    }

    /// Schedule of an empty graph.
    pub fn empty(processors: usize) -> Self {
        Self {
            placements: Vec::new(),
            finish_time: 0,
            processors,
        }
    }

    pub fn placement(&self, task: TaskId) -> Placement {
        self.placements[task]
    }

    pub fn number_of_tasks(&self) -> usize {
        self.placements.len()
    }

    /// Tasks on each processor, ordered by start time (ties by task id).
    pub fn timelines(&self) -> Vec<Vec<TaskId>> {
        let mut lanes: Vec<Vec<TaskId>> = vec![Vec::new(); self.processors];
        for (task, p) in self.placements.iter().enumerate() {
            if let Some(lane) = lanes.get_mut(p.processor) {
                lane.push(task);
            }
        }
        for lane in &mut lanes {
            lane.sort_by_key(|&t| (self.placements[t].start, t));
        }
        lanes
    }

    /// Check that the schedule is executable on `graph`.
    ///
    /// Every task must sit on an existing processor, tasks sharing a processor
    /// must not overlap, every child must start no earlier than each parent's
    /// finish (plus the edge cost when they run on different processors) and
    /// `finish_time` must equal the latest task finish.
    pub fn validate(&self, graph: &TaskGraph) -> Result<(), ScheduleViolation> {
        let n = graph.number_of_tasks();
        if self.placements.len() != n {
            return Err(ScheduleViolation::WrongLength {
                expected: n,
                actual: self.placements.len(),
            });
        }

        for (task, p) in self.placements.iter().enumerate() {
            if p.processor >= self.processors {
                return Err(ScheduleViolation::ProcessorOutOfRange {
                    task,
                    processor: p.processor,
                    processors: self.processors,
                });
            }
        }

        for (processor, lane) in self.timelines().into_iter().enumerate() {
            // Zero-length tasks occupy no time and never overlap.
            let busy: Vec<TaskId> = lane
                .into_iter()
                .filter(|&t| graph.duration(t) > 0)
                .collect();
            for pair in busy.windows(2) {
                let (first, second) = (pair[0], pair[1]);
                let first_end = self.placements[first].start + graph.duration(first);
                if self.placements[second].start < first_end {
                    return Err(ScheduleViolation::Overlap {
                        processor,
                        first,
                        second,
                    });
                }
            }
        }

        for (parent, child, cost) in graph.edges() {
            let p = self.placements[parent];
            let c = self.placements[child];
            let mut ready = p.start + graph.duration(parent);
            if p.processor != c.processor {
                ready += cost;
            }
            if c.start < ready {
                return Err(ScheduleViolation::Precedence {
                    parent,
                    child,
                    ready,
                    start: c.start,
                });
            }
        }

        let actual = graph
            .tasks()
            .map(|t| self.placements[t].start + graph.duration(t))
            .max()
            .unwrap_or(0);
        if actual != self.finish_time {
            return Err(ScheduleViolation::FinishMismatch {
                reported: self.finish_time,
                actual,
            });
        }

        Ok(())
    }

    /// Human-readable summary for stdout.
    pub fn render_summary(&self, graph: &TaskGraph, style: SummaryStyle) -> String {
        let mut out = format!(
            "finish time {} ({} tasks on {} processors)\n",
            self.finish_time,
            self.placements.len(),
            self.processors
        );

        if style == SummaryStyle::Timeline {
            for (processor, lane) in self.timelines().into_iter().enumerate() {
                let _ = write!(out, "  P{}:", processor + 1);
                for task in lane {
                    let p = self.placements[task];
                    let _ = write!(
                        out,
                        " {}[{}..{}]",
                        graph.name(task),
                        p.start,
                        p.start + graph.duration(task)
                    );
                }
                out.push('\n');
            }
        }

        out
    }
}
