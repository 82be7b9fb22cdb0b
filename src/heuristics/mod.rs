// src/heuristics/mod.rs

//! Fast, non-optimal schedulers.
//!
//! - `greedy`: list scheduling under several priority policies; its best
//!   result is the search's initial upper bound and its fallback.
//! - `sequential`: topological concatenation for the one-processor case,
//!   which is already optimal.

pub mod greedy;
pub mod sequential;

pub use greedy::{Priority, greedy_schedule, list_schedule};
pub use sequential::sequential_schedule;
