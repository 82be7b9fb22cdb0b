// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// Time unit used for durations, communication costs and start times.
pub type Time = u64;

/// Dense task index in `[0, n)`.
pub type TaskId = usize;

/// Processor index in `[0, processors)`.
pub type ProcessorId = usize;

/// How the branch-and-bound search executes its branches.
///
/// - `Sequential`: single-threaded depth-first recursion that mutates one
///   search state in place and undoes each mutation on return.
/// - `Parallel`: every `(task, processor)` branch is captured as an owned copy
///   of the search state and handed to a fixed-size rayon pool; a branch
///   completes once all of its children have completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { threads: usize },
}

impl ExecutionStrategy {
    /// Pick a strategy from a worker count; `1` means sequential.
    pub fn from_threads(threads: usize) -> Self {
        if threads <= 1 {
            ExecutionStrategy::Sequential
        } else {
            ExecutionStrategy::Parallel { threads }
        }
    }

    pub fn threads(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { threads } => *threads,
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionStrategy::Parallel { .. })
    }
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        ExecutionStrategy::Sequential
    }
}

impl FromStr for ExecutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        match trimmed.as_str() {
            "sequential" | "seq" => Ok(ExecutionStrategy::Sequential),
            other => {
                let threads: usize = other.parse().map_err(|_| {
                    format!(
                        "invalid execution strategy: {other} (expected \"sequential\" or a thread count)"
                    )
                })?;
                if threads == 0 {
                    return Err("thread count must be >= 1 (got 0)".to_string());
                }
                Ok(ExecutionStrategy::from_threads(threads))
            }
        }
    }
}

/// Format used when the solver prints a schedule to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    /// Only the finish time.
    Brief,
    /// One line per processor listing its tasks and start times.
    Timeline,
}

impl Default for SummaryStyle {
    fn default() -> Self {
        SummaryStyle::Brief
    }
}
