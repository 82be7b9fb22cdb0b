// src/search/engine.rs

//! Branch-and-bound search for an optimal schedule.
//!
//! One recursive algorithm serves both execution strategies. Each node of
//! the search tree:
//!
//! 1. stops if the monitor was cancelled,
//! 2. offers itself to the incumbent if every task is placed,
//! 3. stops if an equivalent partial schedule was already expanded,
//! 4. takes the fixed task order fast path when it applies,
//! 5. otherwise branches over `(candidate, processor)` pairs.
//!
//! With [`ExecutionStrategy::Sequential`] a branch recurses into the same
//! state and undoes its mutation on return. With
//! [`ExecutionStrategy::Parallel`] a branch clones the state and all clones
//! of one candidate run on a rayon pool before the next candidate is tried.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use crate::errors::{Result, SchedError};
use crate::graph::{Preprocessed, TaskGraph};
use crate::schedule::Schedule;
use crate::search::fingerprint::{Fingerprint, VisitedSet};
use crate::search::fixed_order::fixed_task_order;
use crate::search::incumbent::Incumbent;
use crate::search::monitor::SearchMonitor;
use crate::search::state::SearchState;
use crate::types::{ExecutionStrategy, TaskId, Time};

/// Optimal scheduler for one graph and processor count.
#[derive(Debug)]
pub struct SearchEngine<'g> {
    graph: &'g TaskGraph,
    processors: usize,
    strategy: ExecutionStrategy,
    preprocessed: Preprocessed,
    monitor: Arc<SearchMonitor>,
}

impl<'g> SearchEngine<'g> {
    pub fn new(graph: &'g TaskGraph, processors: usize, strategy: ExecutionStrategy) -> Result<Self> {
        if processors == 0 {
            return Err(SchedError::InvalidProcessorCount(processors));
        }
        if let ExecutionStrategy::Parallel { threads: 0 } = strategy {
            return Err(SchedError::Config(
                "parallel search needs at least one thread".to_string(),
            ));
        }

        Ok(Self {
            graph,
            processors,
            strategy,
            preprocessed: Preprocessed::compute(graph),
            monitor: Arc::new(SearchMonitor::new()),
        })
    }

    /// Report progress to (and accept cancellation from) `monitor`.
    pub fn with_monitor(mut self, monitor: Arc<SearchMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn monitor(&self) -> &Arc<SearchMonitor> {
        &self.monitor
    }

    pub fn preprocessed(&self) -> &Preprocessed {
        &self.preprocessed
    }

    pub fn processors(&self) -> usize {
        self.processors
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Find an optimal schedule finishing strictly before `upper_bound`.
    ///
    /// Returns `Ok(None)` when no such schedule exists.
    pub fn search(&self, upper_bound: Time) -> Result<Option<Schedule>> {
        let incumbent = Incumbent::with_bound(upper_bound, Arc::clone(&self.monitor));
        self.run(&incumbent)?;
        Ok(incumbent.into_best())
    }

    /// Search for a schedule better than `initial` and return the optimum,
    /// which is `initial` itself when nothing beats it.
    pub fn improve(&self, initial: Schedule) -> Result<Schedule> {
        let fallback = initial.clone();
        let incumbent = Incumbent::with_schedule(initial, Arc::clone(&self.monitor));
        self.run(&incumbent)?;
        Ok(incumbent.into_best().unwrap_or(fallback))
    }

    fn run(&self, incumbent: &Incumbent) -> Result<()> {
        let visited = VisitedSet::new();
        let search = Search {
            graph: self.graph,
            processors: self.processors,
            preprocessed: &self.preprocessed,
            incumbent,
            visited: &visited,
            monitor: &self.monitor,
            parallel: self.strategy.is_parallel(),
        };

        info!(
            tasks = self.graph.number_of_tasks(),
            processors = self.processors,
            threads = self.strategy.threads(),
            upper_bound = incumbent.bound(),
            "starting optimal search"
        );

        let mut root = SearchState::new(self.graph, self.processors);
        match self.strategy {
            ExecutionStrategy::Sequential => search.explore(&mut root),
            ExecutionStrategy::Parallel { threads } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("dagsched-search-{i}"))
                    .build()?;
                pool.install(|| search.explore(&mut root));
            }
        }

        self.monitor.mark_finished();

        info!(
            states = self.monitor.states_explored(),
            fingerprints = visited.len(),
            finish_time = incumbent.bound(),
            "search finished"
        );

        if self.monitor.is_cancelled() {
            return Err(SchedError::SearchAborted);
        }
        Ok(())
    }
}

/// How a forked or recursed branch continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    General,
    FixedOrder,
}

/// Lower bounds of a state, compared against the incumbent before each
/// branch because the incumbent can improve while siblings run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bounds {
    earliest: Time,
    latest: Time,
    load_balanced: Time,
    critical_path: Time,
}

impl Bounds {
    /// `true` when no completion of the state can beat `best`.
    pub(crate) fn prunes(&self, best: Time) -> bool {
        self.earliest + self.load_balanced >= best
            || self.earliest + self.critical_path >= best
            || self.latest >= best
    }
}

/// Shared, read-mostly context of one search invocation.
pub(crate) struct Search<'a> {
    pub(crate) graph: &'a TaskGraph,
    pub(crate) processors: usize,
    pub(crate) preprocessed: &'a Preprocessed,
    pub(crate) incumbent: &'a Incumbent,
    pub(crate) visited: &'a VisitedSet,
    pub(crate) monitor: &'a SearchMonitor,
    pub(crate) parallel: bool,
}

impl Search<'_> {
    pub(crate) fn explore(&self, state: &mut SearchState) {
        if !self.enter(state) {
            return;
        }

        if let Some(order) = fixed_task_order(self.graph, state) {
            let original = state.replace_candidates(order);
            self.branch_fixed_order(state);
            state.replace_candidates(original);
            return;
        }

        self.branch(state);
    }

    /// Per-node bookkeeping shared by both entry points. Returns `false`
    /// when the node needs no further expansion.
    pub(crate) fn enter(&self, state: &SearchState) -> bool {
        self.monitor.record_state();
        if self.monitor.is_cancelled() {
            return false;
        }

        if state.is_complete() {
            self.incumbent
                .offer(state.latest_finish(), || state.to_schedule());
            return false;
        }

        self.visited.insert(Fingerprint::of(state))
    }

    pub(crate) fn bounds(&self, state: &SearchState) -> Bounds {
        let critical_path = state
            .candidates()
            .iter()
            .map(|&t| self.preprocessed.bottom_levels[t])
            .max()
            .unwrap_or(0);
        Bounds {
            earliest: state.earliest_finish(),
            latest: state.latest_finish(),
            load_balanced: state.remaining_duration().div_ceil(self.processors as Time),
            critical_path,
        }
    }

    fn branch(&self, state: &mut SearchState) {
        let mut order: Vec<TaskId> = state.candidates().to_vec();
        order.sort_by_key(|&t| (self.preprocessed.bottom_levels[t], t));

        let bounds = self.bounds(state);
        let mut tried_classes: Vec<usize> = Vec::with_capacity(order.len());

        for task in order {
            let class = self.preprocessed.equivalence.class_of(task);
            if tried_classes.contains(&class) {
                continue;
            }
            tried_classes.push(class);

            if bounds.prunes(self.incumbent.bound()) {
                break;
            }

            let release = state.release(self.graph, task);
            let forks = self.place_on_processors(state, task, Continuation::General);
            state.restore(self.graph, task, release);
            self.run_forks(forks);
        }
    }

    /// Try `task` (already released) on every useful processor.
    ///
    /// Sequential mode recurses in place and returns no forks; parallel mode
    /// returns one owned state per processor for [`Search::run_forks`].
    pub(crate) fn place_on_processors(
        &self,
        state: &mut SearchState,
        task: TaskId,
        next: Continuation,
    ) -> Vec<(SearchState, Continuation)> {
        let mut forks = Vec::new();
        let ready = state.data_ready(self.graph, task);
        let bottom_level = self.preprocessed.bottom_levels[task];
        let mut idle_tried = false;

        for processor in 0..self.processors {
            // Empty processors are interchangeable: try only the first.
            if state.is_idle(processor) {
                if idle_tried {
                    continue;
                }
                idle_tried = true;
            }

            let start = state.processor_finish(processor).max(ready.on(processor));
            if start + bottom_level >= self.incumbent.bound() {
                continue;
            }

            let previous = state.place(self.graph, task, processor, start);
            if self.parallel {
                forks.push((state.clone(), next));
            } else {
                self.descend(state, next);
            }
            state.unplace(task, processor, previous);
        }

        forks
    }

    pub(crate) fn run_forks(&self, forks: Vec<(SearchState, Continuation)>) {
        if forks.len() <= 1 {
            for (mut state, next) in forks {
                self.descend(&mut state, next);
            }
            return;
        }
        forks
            .into_par_iter()
            .for_each(|(mut state, next)| self.descend(&mut state, next));
    }

    fn descend(&self, state: &mut SearchState, next: Continuation) {
        match next {
            Continuation::General => self.explore(state),
            Continuation::FixedOrder => self.explore_fixed_order(state),
        }
    }
}
