use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for tfguard reports.
pub const SCHEMA_REPORT_V1: &str = "tfguard.report.v1";

/// Severity is intentionally small: it maps cleanly to CI signals.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Outcome of one rule against one evaluation unit.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Fail,
    Pass,
}

/// Opaque location token attached to blocks and attributes by the parser.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct SourceRange {
    pub path: RepoPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

impl SourceRange {
    pub fn new(path: impl Into<RepoPath>, start_line: u32, end_line: u32) -> Self {
        Self {
            path: path.into(),
            start_line: Some(start_line),
            end_line: Some(end_line),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanResult {
    pub rule_code: String,
    pub check_id: String,
    pub status: Status,
    pub severity: Severity,
    pub description: String,

    /// Resource address of the evaluation unit, e.g.
    /// `azurerm_network_security_group.web.security_rule[1]`.
    pub resource: String,

    pub location: SourceRange,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_code + resource + location.path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

/// Something the engine could not turn into a result, scoped to one unit or block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_code: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceRange>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

/// Whether every evaluation unit ran.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Completion {
    Complete,
    /// The caller cancelled the scan. Results produced before cancellation are kept.
    Cancelled { skipped_units: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanSummary {
    pub profile: String,
    pub blocks_scanned: u32,
    pub units_evaluated: u32,
    pub passed: u32,
    pub failed: u32,
    pub diagnostics: u32,
    pub completion: Completion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub results: Vec<ScanResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ScanSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_severity_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Fail).unwrap(), "\"fail\"");
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn cancelled_completion_carries_skipped_count() {
        let json = serde_json::to_value(Completion::Cancelled { skipped_units: 3 }).unwrap();
        assert_eq!(json["state"], "cancelled");
        assert_eq!(json["skipped_units"], 3);
    }

    #[test]
    fn source_range_omits_missing_lines() {
        let range = SourceRange {
            path: RepoPath::new("main.tf"),
            start_line: None,
            end_line: None,
        };
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json, serde_json::json!({ "path": "main.tf" }));
    }
}
