//! The `check` use case: resolve config, scan the block graph, produce a report.

use anyhow::Context;
use tfguard_domain::CancelFlag;
use tfguard_settings::{Overrides, ResolvedConfig};
use tfguard_types::{SCHEMA_REPORT_V1, ScanReport, ToolMeta, Verdict};
use time::OffsetDateTime;

use crate::graph_input::load_graph;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Block graph JSON from the parsing layer.
    pub graph_json: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Caller-owned cancellation; `None` runs to completion.
    pub cancel: Option<CancelFlag>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ScanReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        tfguard_settings::TfguardConfigV1::default()
    } else {
        tfguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = tfguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let loaded = load_graph(input.graph_json)?;

    tracing::info!(
        profile = %resolved.effective.profile,
        blocks = loaded.graph.len(),
        jobs = resolved.effective.jobs,
        "scan started"
    );

    let cancel = input.cancel.unwrap_or_default();
    let domain = tfguard_domain::scan_with_cancel(&loaded.graph, &resolved.effective, &cancel);

    let mut diagnostics = loaded.diagnostics;
    diagnostics.extend(domain.diagnostics);
    let mut summary = domain.summary;
    summary.diagnostics = diagnostics.len() as u32;

    tracing::info!(
        verdict = ?domain.verdict,
        passed = summary.passed,
        failed = summary.failed,
        diagnostics = summary.diagnostics,
        "scan finished"
    );

    let report = ScanReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "tfguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: domain.verdict,
        results: domain.results,
        diagnostics,
        summary,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
