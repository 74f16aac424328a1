//! Serializing and summarizing reports for output.

use anyhow::Context;
use tfguard_types::{Completion, ScanReport, Status, Verdict};

pub fn serialize_report(report: &ScanReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Human summary: one line per failure and diagnostic, then totals.
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();

    for r in report.results.iter().filter(|r| r.status == Status::Fail) {
        let line = r
            .location
            .start_line
            .map(|l| format!(":{l}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "FAIL {} {}{} {}: {}\n",
            r.rule_code,
            r.location.path.as_str(),
            line,
            r.resource,
            r.description
        ));
    }

    for d in &report.diagnostics {
        out.push_str(&format!("DIAG {}: {}\n", d.code, d.message));
    }

    let s = &report.summary;
    let verdict = match report.verdict {
        Verdict::Pass => "pass",
        Verdict::Warn => "warn",
        Verdict::Fail => "fail",
    };
    out.push_str(&format!(
        "verdict: {verdict} ({} failed, {} passed, {} diagnostics, {} blocks)\n",
        s.failed, s.passed, s.diagnostics, s.blocks_scanned
    ));
    if let Completion::Cancelled { skipped_units } = s.completion {
        out.push_str(&format!("scan cancelled: {skipped_units} units skipped\n"));
    }
    if let Some(reason) = &s.truncated_reason {
        out.push_str(&format!("note: {reason}\n"));
    }

    out
}
