//! Use case orchestration for tfguard.
//!
//! This crate is the application layer: use cases that coordinate settings and the domain
//! engine. The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod graph_input;
mod render;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use graph_input::{LoadedGraph, load_graph};
pub use render::{render_text, serialize_report};
pub use rules::{RuleInfo, format_rules, list_rules};
