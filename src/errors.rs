// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("DOT parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid task graph: {0}")]
    InvalidGraph(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("Processor count must be >= 1 (got {0})")]
    InvalidProcessorCount(usize),

    #[error("Search was aborted before it completed")]
    SearchAborted,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SchedError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SchedError>;
