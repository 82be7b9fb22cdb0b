use std::io::Write;
use std::path::{Path, PathBuf};

use dagsched::config::loader::normalize_output_path;
use dagsched::config::{default_output_path, load_and_validate, load_or_default};
use dagsched::errors::SchedError;
use dagsched::types::{ExecutionStrategy, SummaryStyle};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_full_config_is_loaded() {
    let file = write_config(
        r#"
[search]
threads = 4
progress_interval_ms = 250
timeout_secs = 30

[output]
suffix = "-optimal"
summary = "timeline"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.search.threads, 4);
    assert_eq!(cfg.search.progress_interval_ms, 250);
    assert_eq!(cfg.search.timeout_secs, Some(30));
    assert_eq!(cfg.output.suffix, "-optimal");
    assert_eq!(cfg.output.summary, SummaryStyle::Timeline);
    assert_eq!(cfg.strategy(), ExecutionStrategy::Parallel { threads: 4 });
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.search.threads, 1);
    assert_eq!(cfg.search.progress_interval_ms, 1000);
    assert_eq!(cfg.search.timeout_secs, None);
    assert_eq!(cfg.output.suffix, "-output");
    assert_eq!(cfg.output.summary, SummaryStyle::Brief);
    assert_eq!(cfg.strategy(), ExecutionStrategy::Sequential);

    let cfg = load_or_default(None).unwrap();
    assert_eq!(cfg.search.threads, 1);
}

#[test]
fn test_zero_threads_returns_config_error() {
    let file = write_config("[search]\nthreads = 0\n");

    match load_and_validate(file.path()) {
        Err(SchedError::Config(msg)) => assert!(msg.contains("threads")),
        Err(e) => panic!("Expected Config error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_zero_timeout_and_bad_suffix_are_rejected() {
    let file = write_config("[search]\ntimeout_secs = 0\n");
    assert!(matches!(load_and_validate(file.path()), Err(SchedError::Config(msg)) if msg.contains("timeout_secs")));

    let file = write_config("[output]\nsuffix = \"a/b\"\n");
    assert!(matches!(load_and_validate(file.path()), Err(SchedError::Config(msg)) if msg.contains("path separators")));

    let file = write_config("[output]\nsuffix = \"  \"\n");
    assert!(matches!(load_and_validate(file.path()), Err(SchedError::Config(_))));
}

#[test]
fn test_malformed_toml_returns_toml_error() {
    let file = write_config("[search\nthreads = 2\n");
    assert!(matches!(load_and_validate(file.path()), Err(SchedError::Toml(_))));

    let file = write_config("[output]\nsummary = \"verbose\"\n");
    assert!(matches!(load_and_validate(file.path()), Err(SchedError::Toml(_))));
}

#[test]
fn test_missing_file_returns_io_error() {
    let result = load_and_validate("/definitely/not/here/dagsched.toml");
    assert!(matches!(result, Err(SchedError::Io(_))));
}

#[test]
fn test_output_paths() {
    assert_eq!(
        default_output_path(Path::new("graphs/fork.dot"), "-output"),
        PathBuf::from("graphs/fork-output.dot")
    );
    assert_eq!(
        normalize_output_path(PathBuf::from("out/result")),
        PathBuf::from("out/result.dot")
    );
    assert_eq!(
        normalize_output_path(PathBuf::from("out/result.dot")),
        PathBuf::from("out/result.dot")
    );
}

#[test]
fn test_strategy_from_str() {
    assert_eq!("seq".parse::<ExecutionStrategy>(), Ok(ExecutionStrategy::Sequential));
    assert_eq!("1".parse::<ExecutionStrategy>(), Ok(ExecutionStrategy::Sequential));
    assert_eq!(
        "8".parse::<ExecutionStrategy>(),
        Ok(ExecutionStrategy::Parallel { threads: 8 })
    );
    assert!("0".parse::<ExecutionStrategy>().is_err());
    assert!("fast".parse::<ExecutionStrategy>().is_err());
}
