// src/graph/mod.rs

//! Task graph model, DOT input/output and one-off preprocessing.

pub mod dot;
pub mod preprocess;
pub mod task_graph;

pub use dot::{DotGraph, parse_dot, read_dot_file, render_dot, write_dot_file};
pub use preprocess::{EquivalenceClasses, Preprocessed, bottom_levels};
pub use task_graph::{Edge, TaskGraph, TaskGraphBuilder};
