// src/logging.rs

//! Logging for `dagsched`: a `tracing-subscriber` fmt layer on stderr,
//! driven by an `EnvFilter`.
//!
//! `--log-level` sets one level for the whole crate. Without it the
//! `DAGSCHED_LOG` variable is read as a filter directive list, so
//! `DAGSCHED_LOG=info,dagsched::search=debug` narrows debug output to the
//! search. Anything unset or unparsable falls back to `info`.
//!
//! Search worker threads are named `dagsched-search-N`; the thread name is
//! printed so parallel runs can be told apart. Stdout is left to the
//! schedule summary.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "DAGSCHED_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Filter for the given CLI level, or from `DAGSCHED_LOG` when absent.
pub fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    match cli_level {
        Some(level) => EnvFilter::new(directive(level)),
        None => EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
