// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod heuristics;
pub mod logging;
pub mod schedule;
pub mod search;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::normalize_output_path;
use crate::config::{ConfigFile, default_output_path, load_or_default};
use crate::errors::SchedError;
use crate::graph::{DotGraph, Preprocessed, TaskGraph, read_dot_file, write_dot_file};
use crate::heuristics::{greedy_schedule, sequential_schedule};
use crate::schedule::Schedule;
use crate::search::{SearchMonitor, solve};
use crate::types::ExecutionStrategy;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading and CLI overrides
/// - DOT parsing and graph validation
/// - the greedy bound and the optimal search on a blocking thread
/// - progress logging, timeout and Ctrl-C handling
/// - writing the scheduled DOT file and printing the summary
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;

    if args.processors == 0 {
        return Err(SchedError::InvalidProcessorCount(0).into());
    }
    let threads = args.threads.unwrap_or(cfg.search.threads);
    if threads == 0 {
        return Err(SchedError::Config("--threads must be >= 1 (got 0)".to_string()).into());
    }
    let strategy = ExecutionStrategy::from_threads(threads);

    let DotGraph { name, graph } = read_dot_file(&args.input)?;
    let graph = Arc::new(graph);
    info!(
        graph = %name,
        tasks = graph.number_of_tasks(),
        edges = graph.edge_count(),
        processors = args.processors,
        "loaded task graph"
    );

    if args.dry_run {
        print_dry_run(&name, &graph, args.processors);
        return Ok(());
    }

    let output = resolve_output_path(&args, &cfg);

    let options = ShellOptions {
        strategy,
        processors: args.processors,
        progress: args.progress,
        progress_interval: Duration::from_millis(cfg.search.progress_interval_ms),
        timeout: args
            .timeout
            .or(cfg.search.timeout_secs)
            .map(Duration::from_secs),
    };
    let schedule = search_with_shell(Arc::clone(&graph), options).await?;

    if let Err(violation) = schedule.validate(&graph) {
        return Err(anyhow!("produced an invalid schedule: {violation}"));
    }

    write_dot_file(&output, &name, &graph, &schedule)?;
    info!(path = %output.display(), finish_time = schedule.finish_time, "schedule written");

    print!("{}", schedule.render_summary(&graph, cfg.output.summary));
    Ok(())
}

fn resolve_output_path(args: &CliArgs, cfg: &ConfigFile) -> PathBuf {
    match &args.output {
        Some(path) => normalize_output_path(path.clone()),
        None => default_output_path(&args.input, &cfg.output.suffix),
    }
}

struct ShellOptions {
    strategy: ExecutionStrategy,
    processors: usize,
    progress: bool,
    progress_interval: Duration,
    timeout: Option<Duration>,
}

/// Run [`solve`] on a blocking thread while the async side watches the
/// clock, Ctrl-C and (optionally) logs progress.
///
/// If the search is cancelled the best schedule published so far is kept.
/// The greedy seed is published before the search starts, so that is never
/// worse than the greedy bound.
async fn search_with_shell(graph: Arc<TaskGraph>, options: ShellOptions) -> Result<Schedule> {
    let monitor = Arc::new(SearchMonitor::new());
    let mut handle = tokio::task::spawn_blocking({
        let graph = Arc::clone(&graph);
        let monitor = Arc::clone(&monitor);
        move || solve(&graph, options.processors, options.strategy, monitor)
    });

    let mut ticker = tokio::time::interval(options.progress_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let deadline = async {
        match options.timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut cancelled = false;

    loop {
        tokio::select! {
            joined = &mut handle => {
                let joined = joined.map_err(|e| anyhow!("search thread failed: {e}"))?;
                return match joined {
                    Ok(schedule) => {
                        info!(
                            finish_time = schedule.finish_time,
                            states = monitor.states_explored(),
                            "optimal schedule found"
                        );
                        Ok(schedule)
                    }
                    Err(SchedError::SearchAborted) => {
                        let best = monitor
                            .best_schedule()
                            .ok_or_else(|| anyhow!("search aborted before any schedule was found"))?;
                        warn!(
                            finish_time = best.finish_time,
                            "search aborted; keeping the best schedule found so far (may not be optimal)"
                        );
                        Ok(best)
                    }
                    Err(e) => Err(e.into()),
                };
            }

            _ = ticker.tick(), if options.progress => {
                let snapshot = monitor.snapshot();
                info!(
                    states = snapshot.states_explored,
                    best = ?snapshot.best_finish_time,
                    improved = monitor.take_best_changed(),
                    "search progress"
                );
            }

            _ = &mut deadline, if !cancelled => {
                warn!("search timeout reached; cancelling");
                monitor.cancel();
                cancelled = true;
            }

            res = &mut ctrl_c, if !cancelled => {
                if let Err(e) = res {
                    warn!("failed to listen for Ctrl+C: {e}");
                } else {
                    info!("Ctrl+C received; cancelling search");
                }
                monitor.cancel();
                cancelled = true;
            }
        }
    }
}

/// Dry-run output: graph summary, bottom levels and the greedy bound.
fn print_dry_run(name: &str, graph: &TaskGraph, processors: usize) {
    let preprocessed = Preprocessed::compute(graph);

    println!("dagsched dry-run");
    println!("  graph = {name}");
    println!("  processors = {processors}");
    println!("  edges = {}", graph.edge_count());
    println!("  total duration = {}", graph.total_duration());
    println!("  equivalence classes = {}", preprocessed.equivalence.len());
    println!();

    println!("tasks ({}):", graph.number_of_tasks());
    for task in graph.tasks() {
        println!(
            "  - {} (weight {}, bottom level {})",
            graph.name(task),
            graph.duration(task),
            preprocessed.bottom_levels[task]
        );
        for edge in graph.out_edges(task) {
            println!("      -> {} (cost {})", graph.name(edge.task), edge.cost);
        }
    }

    if processors > 0 {
        let bound = if processors == 1 {
            sequential_schedule(graph)
        } else {
            greedy_schedule(graph, processors, &preprocessed.bottom_levels)
        };
        println!();
        println!("greedy finish time = {}", bound.finish_time);
    }

    debug!("dry-run complete (no search)");
}
