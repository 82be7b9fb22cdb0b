// src/graph/dot.rs

//! Reader and writer for the DOT dialect used to exchange task graphs.
//!
//! Input looks like:
//!
//! ```text
//! digraph "example" {
//!     a [Weight=2];
//!     b [Weight=3];
//!     a -> b [Weight=1];
//! }
//! ```
//!
//! Node `Weight` is the task duration, edge `Weight` the communication cost.
//! The writer emits the same dialect and adds `Start` and `Processor`
//! (1-based) to every node.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::{Result, SchedError};
use crate::graph::{TaskGraph, TaskGraphBuilder};
use crate::schedule::Schedule;
use crate::types::Time;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:strict\s+)?digraph\s*(?:"([^"]*)"|([\w.]+))?\s*\{$"#)
        .expect("valid header regex")
});

static EDGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"([^"]+)"|([\w.]+))\s*->\s*(?:"([^"]+)"|([\w.]+))\s*(?:\[(.*)\])?$"#)
        .expect("valid edge regex")
});

static NODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"([^"]+)"|([\w.]+))\s*(?:\[(.*)\])?$"#).expect("valid node regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s*=\s*(?:"([^"]*)"|([^,;\s\]]+))"#).expect("valid attribute regex")
});

static PLAIN_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("valid identifier regex"));

/// A task graph read from DOT, plus the graph's own name.
#[derive(Debug, Clone)]
pub struct DotGraph {
    pub name: String,
    pub graph: TaskGraph,
}

/// Read and parse a DOT file.
pub fn read_dot_file(path: impl AsRef<Path>) -> Result<DotGraph> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let parsed = parse_dot(&contents)?;
    debug!(
        path = %path.display(),
        tasks = parsed.graph.number_of_tasks(),
        edges = parsed.graph.edge_count(),
        "parsed task graph"
    );
    Ok(parsed)
}

struct PendingEdge {
    line: usize,
    from: String,
    to: String,
    cost: Time,
}

/// Parse DOT source text into a validated [`TaskGraph`].
pub fn parse_dot(source: &str) -> Result<DotGraph> {
    let mut name: Option<String> = None;
    let mut seen_header = false;
    let mut closed = false;
    let mut builder = TaskGraphBuilder::new();
    let mut ids: HashMap<String, usize> = HashMap::new();
    let mut edges: Vec<PendingEdge> = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        // Braces end statements just like semicolons.
        let line = strip_comment(raw_line)
            .replace('{', "{;")
            .replace('}', ";};");

        for statement in line.split(';') {
            let stmt = statement.trim();
            if stmt.is_empty() {
                continue;
            }

            if !seen_header {
                let caps = HEADER_RE.captures(stmt).ok_or_else(|| {
                    SchedError::parse(line_no, format!("expected `digraph <name> {{`, found `{stmt}`"))
                })?;
                name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str().to_string());
                seen_header = true;
                continue;
            }

            if closed {
                return Err(SchedError::parse(
                    line_no,
                    format!("unexpected content after closing brace: `{stmt}`"),
                ));
            }

            if stmt == "}" {
                closed = true;
                continue;
            }

            if let Some(caps) = EDGE_RE.captures(stmt) {
                let from = pick(&caps, 1, 2);
                let to = pick(&caps, 3, 4);
                let attrs = parse_attributes(caps.get(5).map_or("", |m| m.as_str()));
                let cost = match attrs.get("weight") {
                    Some(value) => parse_weight(value, line_no)?,
                    None => 0,
                };
                edges.push(PendingEdge {
                    line: line_no,
                    from,
                    to,
                    cost,
                });
                continue;
            }

            if let Some(caps) = NODE_RE.captures(stmt) {
                let node = pick(&caps, 1, 2);
                // Default attribute statements (`node [...]`, `graph [...]`).
                if matches!(node.as_str(), "node" | "edge" | "graph") {
                    continue;
                }
                let attrs = parse_attributes(caps.get(3).map_or("", |m| m.as_str()));
                let duration = attrs.get("weight").ok_or_else(|| {
                    SchedError::parse(line_no, format!("task '{node}' has no Weight attribute"))
                })?;
                let duration = parse_weight(duration, line_no)?;
                if ids.contains_key(&node) {
                    return Err(SchedError::parse(
                        line_no,
                        format!("task '{node}' declared twice"),
                    ));
                }
                let id = builder.add_task(node.clone(), duration);
                ids.insert(node, id);
                continue;
            }

            return Err(SchedError::parse(
                line_no,
                format!("unrecognised statement `{stmt}`"),
            ));
        }
    }

    if !seen_header {
        return Err(SchedError::parse(1, "input contains no digraph"));
    }
    if !closed {
        return Err(SchedError::parse(
            source.lines().count().max(1),
            "missing closing brace",
        ));
    }

    for edge in edges {
        let from = *ids.get(&edge.from).ok_or_else(|| {
            SchedError::parse(edge.line, format!("edge references undeclared task '{}'", edge.from))
        })?;
        let to = *ids.get(&edge.to).ok_or_else(|| {
            SchedError::parse(edge.line, format!("edge references undeclared task '{}'", edge.to))
        })?;
        builder.add_edge(from, to, edge.cost);
    }

    Ok(DotGraph {
        name: name.unwrap_or_else(|| "schedule".to_string()),
        graph: builder.build()?,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn pick(caps: &regex::Captures<'_>, quoted: usize, plain: usize) -> String {
    caps.get(quoted)
        .or_else(|| caps.get(plain))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Attribute keys are lower-cased so `Weight` and `weight` both work.
fn parse_attributes(list: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(list)
        .map(|caps| {
            let key = caps[1].to_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (key, value)
        })
        .collect()
}

/// Weights are non-negative integers; integral floats such as `2.0` are
/// accepted and truncated.
fn parse_weight(value: &str, line: usize) -> Result<Time> {
    let value = value.trim();
    if let Ok(v) = value.parse::<Time>() {
        return Ok(v);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v.trunc() as Time),
        Ok(v) => Err(SchedError::parse(
            line,
            format!("weight must be a non-negative number (got {v})"),
        )),
        Err(_) => Err(SchedError::parse(line, format!("invalid weight `{value}`"))),
    }
}

fn quote_id(id: &str) -> String {
    if PLAIN_ID_RE.is_match(id) {
        id.to_string()
    } else {
        format!("\"{}\"", id.replace('"', "\\\""))
    }
}

/// Render a scheduled graph in DOT form.
pub fn render_dot(name: &str, graph: &TaskGraph, schedule: &Schedule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{}\" {{", name.replace('"', "\\\""));

    for task in graph.tasks() {
        let placement = schedule.placement(task);
        let _ = writeln!(
            out,
            "\t{}\t [Weight={},Start={},Processor={}];",
            quote_id(graph.name(task)),
            graph.duration(task),
            placement.start,
            placement.processor + 1
        );
    }

    for (parent, child, cost) in graph.edges() {
        let _ = writeln!(
            out,
            "\t{} -> {}\t [Weight={}];",
            quote_id(graph.name(parent)),
            quote_id(graph.name(child)),
            cost
        );
    }

    out.push_str("}\n");
    out
}

/// Write a scheduled graph to disk.
pub fn write_dot_file(
    path: impl AsRef<Path>,
    name: &str,
    graph: &TaskGraph,
    schedule: &Schedule,
) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_dot(name, graph, schedule))?;
    debug!(path = %path.display(), "wrote schedule");
    Ok(())
}
