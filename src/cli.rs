// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagsched`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagsched",
    version,
    about = "Compute an optimal static schedule of a task DAG on identical processors.",
    long_about = None
)]
pub struct CliArgs {
    /// Task graph in DOT format (`Weight` on nodes and edges).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of processors to schedule onto.
    #[arg(value_name = "PROCESSORS")]
    pub processors: usize,

    /// Worker threads for the search (1 runs the sequential engine).
    ///
    /// Overrides `[search].threads` from the config file.
    #[arg(short = 'p', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Output DOT path.
    ///
    /// Default: `<input stem><suffix>.dot` next to the input file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Optional settings file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Abandon the search after this many seconds and keep the greedy bound.
    ///
    /// Overrides `[search].timeout_secs`.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Periodically log search progress (explored states, current best).
    #[arg(long)]
    pub progress: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGSCHED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the graph summary and greedy bound, but don't search.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
