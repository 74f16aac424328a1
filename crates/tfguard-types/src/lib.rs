//! Stable DTOs and IDs used across the tfguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable rule codes and check ids
//! - canonical repo-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod path;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use path::RepoPath;
pub use receipt::{
    Completion, Diagnostic, SCHEMA_REPORT_V1, ScanReport, ScanResult, ScanSummary, Severity,
    SourceRange, Status, ToolMeta, Verdict,
};
