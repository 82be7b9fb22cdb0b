// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SchedError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SchedError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.search, raw.output))
    }
}

/// Check the semantic invariants of a deserialized settings file.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_search_section(cfg)?;
    validate_output_section(cfg)?;
    Ok(())
}

fn validate_search_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.search.threads == 0 {
        return Err(SchedError::Config(
            "[search].threads must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.search.progress_interval_ms == 0 {
        return Err(SchedError::Config(
            "[search].progress_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.search.timeout_secs == Some(0) {
        return Err(SchedError::Config(
            "[search].timeout_secs must be >= 1 when set (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_section(cfg: &RawConfigFile) -> Result<()> {
    let suffix = cfg.output.suffix.trim();
    if suffix.is_empty() {
        return Err(SchedError::Config(
            "[output].suffix must not be empty".to_string(),
        ));
    }
    if suffix.contains(['/', '\\']) {
        return Err(SchedError::Config(format!(
            "[output].suffix must not contain path separators (got '{}')",
            cfg.output.suffix
        )));
    }
    Ok(())
}
