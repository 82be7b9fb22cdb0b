// src/config/model.rs

use serde::Deserialize;

use crate::types::{ExecutionStrategy, SummaryStyle};

/// Settings file as read from TOML, before validation.
///
/// ```toml
/// [search]
/// threads = 4
/// progress_interval_ms = 500
/// timeout_secs = 120
///
/// [output]
/// suffix = "-output"
/// summary = "timeline"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub search: SearchSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// Validated settings. Only constructed through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub search: SearchSection,
    pub output: OutputSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(search: SearchSection, output: OutputSection) -> Self {
        Self { search, output }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::from_threads(self.search.threads)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.search, raw.output)
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    /// Worker threads for the search; `1` runs the sequential engine.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// How often `--progress` logs a monitor snapshot.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Abandon the optimal search after this long and keep the greedy bound.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_threads() -> usize {
    1
}

fn default_progress_interval_ms() -> u64 {
    1000
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            progress_interval_ms: default_progress_interval_ms(),
            timeout_secs: None,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Appended to the input file stem when no `--output` is given.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// What gets printed to stdout once the schedule is known.
    #[serde(default)]
    pub summary: SummaryStyle,
}

fn default_suffix() -> String {
    "-output".to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            summary: SummaryStyle::default(),
        }
    }
}
