use std::io::Write;

use dagsched::errors::SchedError;
use dagsched::graph::{parse_dot, read_dot_file, render_dot, write_dot_file};
use dagsched::heuristics::sequential_schedule;
use tempfile::{NamedTempFile, tempdir};

const EXAMPLE: &str = r#"digraph "example" {
	// tasks
	a	[Weight=2];
	b	[Weight=3];
	c	[Weight="4"];
	a -> b	[Weight=1];
	a -> c	[Weight=2];
	b -> c	[Weight=0];
}
"#;

#[test]
fn test_parse_example_graph() {
    let parsed = parse_dot(EXAMPLE).unwrap();
    let graph = &parsed.graph;

    assert_eq!(parsed.name, "example");
    assert_eq!(graph.number_of_tasks(), 3);
    assert_eq!(graph.duration(graph.find("c").unwrap()), 4);
    assert_eq!(graph.comm_cost(0, 2), 2);
    assert!(graph.has_edge(1, 2));
    assert_eq!(graph.comm_cost(1, 2), 0);
}

#[test]
fn test_parse_compact_and_quoted_input() {
    let parsed = parse_dot(
        "digraph g { \"task one\" [Weight=1.0]; t2 [label=x, Weight=2]; \"task one\" -> t2 [Weight=3]; }",
    );
    // Everything on one line, including the closing brace.
    let parsed = parsed.unwrap();
    assert_eq!(parsed.name, "g");
    assert_eq!(parsed.graph.find("task one"), Some(0));
    assert_eq!(parsed.graph.duration(1), 2);
    assert_eq!(parsed.graph.comm_cost(0, 1), 3);
}

#[test]
fn test_undeclared_task_reports_line() {
    let source = "digraph g {\n  a [Weight=1];\n  a -> ghost [Weight=1];\n}\n";
    match parse_dot(source) {
        Err(SchedError::Parse { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("ghost"));
        }
        other => panic!("Expected Parse error, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_and_negative_weights_are_errors() {
    let missing = "digraph g {\n  a;\n}\n";
    assert!(matches!(parse_dot(missing), Err(SchedError::Parse { line: 2, .. })));

    let negative = "digraph g {\n  a [Weight=-3];\n}\n";
    assert!(matches!(parse_dot(negative), Err(SchedError::Parse { line: 2, .. })));
}

#[test]
fn test_header_and_brace_are_required() {
    assert!(matches!(parse_dot("a [Weight=1];"), Err(SchedError::Parse { line: 1, .. })));
    assert!(matches!(
        parse_dot("digraph g {\n a [Weight=1];\n"),
        Err(SchedError::Parse { .. })
    ));
}

#[test]
fn test_cyclic_input_is_rejected() {
    let source = "digraph g {\n a [Weight=1];\n b [Weight=1];\n a -> b [Weight=1];\n b -> a [Weight=1];\n}\n";
    assert!(matches!(parse_dot(source), Err(SchedError::DagCycle(_))));
}

#[test]
fn test_written_schedule_is_readable_again() {
    let parsed = parse_dot(EXAMPLE).unwrap();
    let schedule = sequential_schedule(&parsed.graph);

    let dir = tempdir().unwrap();
    let path = dir.path().join("example-output.dot");
    write_dot_file(&path, &parsed.name, &parsed.graph, &schedule).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("digraph \"example\" {"));
    assert!(text.contains("a\t [Weight=2,Start=0,Processor=1];"));
    assert!(text.contains("b\t [Weight=3,Start=2,Processor=1];"));
    assert!(text.contains("a -> c\t [Weight=2];"));

    let reread = read_dot_file(&path).unwrap();
    assert_eq!(reread.graph.number_of_tasks(), 3);
    assert_eq!(reread.graph.edge_count(), 3);
    assert_eq!(reread.graph.comm_cost(0, 1), 1);
}

#[test]
fn test_read_from_named_temp_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{EXAMPLE}").unwrap();

    let parsed = read_dot_file(file.path()).unwrap();
    assert_eq!(parsed.graph.total_duration(), 9);
    assert_eq!(render_dot(&parsed.name, &parsed.graph, &sequential_schedule(&parsed.graph)).lines().count(), 8);
}
