use crate::checks::{self, CheckDef, EvalContext, Target};
use crate::fingerprint::fingerprint_for_result;
use crate::graph::FrozenGraph;
use crate::model::Block;
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::DomainReport;
use crate::resolve::Resolver;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tfguard_types::{
    Completion, Diagnostic, RepoPath, ScanResult, ScanSummary, Severity, SourceRange, Status,
    Verdict, ids,
};

/// Caller-owned stop signal, checked before every evaluation unit.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One check applied to one block: a top-level block, or a single nested
/// block expanded out of its parent.
#[derive(Clone, Debug)]
pub struct EvalUnit<'g> {
    pub check: &'static CheckDef,
    pub block: &'g Block,
    pub address: String,
    pub severity: Severity,
    /// Where results for this unit point. Nested blocks without their own
    /// range borrow the parent's.
    pub location: SourceRange,
}

pub fn scan(graph: &FrozenGraph, cfg: &EffectiveConfig) -> DomainReport {
    scan_with_cancel(graph, cfg, &CancelFlag::new())
}

/// Scan the frozen graph. If `cancel` fires mid-scan, units not yet started
/// are skipped and the results produced so far are returned with
/// `Completion::Cancelled`.
pub fn scan_with_cancel(
    graph: &FrozenGraph,
    cfg: &EffectiveConfig,
    cancel: &CancelFlag,
) -> DomainReport {
    let units = collect_units(graph, cfg);
    let ctx = EvalContext::new(Resolver::new(graph, cfg.max_resolve_depth));
    let tally = run_units(&units, &ctx, cancel, cfg.jobs);
    finish(graph, cfg, tally)
}

pub fn collect_units<'g>(graph: &'g FrozenGraph, cfg: &EffectiveConfig) -> Vec<EvalUnit<'g>> {
    let mut units = Vec::new();

    for block in graph.blocks() {
        for &check in checks::registry() {
            let Some(policy) = cfg.check_policy(check.rule_code) else {
                continue;
            };

            for target in check.targets {
                match *target {
                    Target::TopLevel(block_type) if block.block_type == block_type => {
                        units.push(EvalUnit {
                            check,
                            block,
                            address: block.address(),
                            severity: policy.severity,
                            location: block.range.clone(),
                        });
                    }
                    Target::Nested { parent, child } if block.block_type == parent => {
                        for (i, nested) in block.get_blocks(child).enumerate() {
                            units.push(EvalUnit {
                                check,
                                block: nested,
                                address: format!("{}.{}[{}]", block.address(), child, i),
                                severity: policy.severity,
                                location: nested_location(block, nested),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    units
}

fn nested_location(parent: &Block, nested: &Block) -> SourceRange {
    if nested.range.path != RepoPath::default() {
        return nested.range.clone();
    }
    if nested.range.start_line.is_none() {
        return parent.range.clone();
    }
    SourceRange {
        path: parent.range.path.clone(),
        ..nested.range.clone()
    }
}

#[derive(Debug, Default)]
pub struct Tally {
    pub results: Vec<ScanResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub evaluated: u32,
    pub skipped: u32,
}

impl Tally {
    fn merge(mut self, other: Tally) -> Tally {
        self.results.extend(other.results);
        self.diagnostics.extend(other.diagnostics);
        self.evaluated += other.evaluated;
        self.skipped += other.skipped;
        self
    }
}

/// Evaluate units with per-worker buffers merged at the end.
pub fn run_units(
    units: &[EvalUnit<'_>],
    ctx: &EvalContext<'_>,
    cancel: &CancelFlag,
    jobs: usize,
) -> Tally {
    let sequential = || {
        units
            .iter()
            .fold(Tally::default(), |acc, unit| step(acc, ctx, unit, cancel))
    };

    if jobs == 1 || units.len() < 2 {
        return sequential();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| {
            units
                .par_iter()
                .fold(Tally::default, |acc, unit| step(acc, ctx, unit, cancel))
                .reduce(Tally::default, Tally::merge)
        }),
        Err(err) => {
            tracing::warn!(error = %err, "could not build worker pool; scanning sequentially");
            sequential()
        }
    }
}

fn step(
    mut tally: Tally,
    ctx: &EvalContext<'_>,
    unit: &EvalUnit<'_>,
    cancel: &CancelFlag,
) -> Tally {
    if cancel.is_cancelled() {
        tally.skipped += 1;
        return tally;
    }

    tally.evaluated += 1;
    match evaluate_unit(ctx, unit) {
        Ok(Some(verdict)) => tally.results.push(to_result(unit, verdict)),
        Ok(None) => {}
        Err(diagnostic) => tally.diagnostics.push(diagnostic),
    }
    tally
}

/// Run one predicate. A panic is contained to this unit and reported as a diagnostic.
pub fn evaluate_unit(
    ctx: &EvalContext<'_>,
    unit: &EvalUnit<'_>,
) -> Result<Option<checks::Verdict>, Diagnostic> {
    let evaluate = unit.check.evaluate;
    panic::catch_unwind(AssertUnwindSafe(|| evaluate(ctx, unit.block))).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(
            rule = unit.check.rule_code,
            resource = %unit.address,
            %message,
            "check panicked; unit skipped"
        );
        Diagnostic {
            code: ids::DIAG_ENGINE_INTERNAL_ERROR.to_string(),
            rule_code: Some(unit.check.rule_code.to_string()),
            message: format!(
                "check {} failed on {}: {}",
                unit.check.rule_code, unit.address, message
            ),
            location: Some(unit.location.clone()),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn to_result(unit: &EvalUnit<'_>, verdict: checks::Verdict) -> ScanResult {
    let location = unit.location.clone();
    let fingerprint = fingerprint_for_result(
        unit.check.rule_code,
        &unit.address,
        location.path.as_str(),
    );
    ScanResult {
        rule_code: unit.check.rule_code.to_string(),
        check_id: unit.check.check_id.to_string(),
        status: verdict.status,
        severity: unit.severity,
        description: verdict.description,
        resource: unit.address.clone(),
        location,
        fingerprint: Some(fingerprint),
        data: verdict.data,
    }
}

fn finish(graph: &FrozenGraph, cfg: &EffectiveConfig, tally: Tally) -> DomainReport {
    let Tally {
        mut results,
        mut diagnostics,
        evaluated,
        skipped,
    } = tally;

    let failed = results.iter().filter(|r| r.status == Status::Fail).count() as u32;
    let passed = results.len() as u32 - failed;

    if !cfg.include_passed {
        results.retain(|r| r.status == Status::Fail);
    }

    // Deterministic ordering before truncation.
    results.sort_by(compare_results);
    diagnostics.sort_by(|a, b| {
        a.rule_code
            .cmp(&b.rule_code)
            .then_with(|| a.message.cmp(&b.message))
    });

    let verdict = compute_verdict(&results, cfg.fail_on);

    let mut truncated_reason = None;
    if results.len() > cfg.max_results {
        results.truncate(cfg.max_results);
        truncated_reason = Some(format!(
            "results truncated to max_results={}",
            cfg.max_results
        ));
    }

    let completion = if skipped > 0 {
        Completion::Cancelled {
            skipped_units: skipped,
        }
    } else {
        Completion::Complete
    };

    let summary = ScanSummary {
        profile: cfg.profile.clone(),
        blocks_scanned: graph.len() as u32,
        units_evaluated: evaluated,
        passed,
        failed,
        diagnostics: diagnostics.len() as u32,
        completion,
        truncated_reason,
    };

    DomainReport {
        verdict,
        results,
        diagnostics,
        summary,
    }
}

fn compute_verdict(results: &[ScanResult], fail_on: FailOn) -> Verdict {
    let failing = || results.iter().filter(|r| r.status == Status::Fail);

    if failing().any(|r| r.severity == Severity::Error) {
        return Verdict::Fail;
    }

    if failing().any(|r| r.severity == Severity::Warning) {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_results(a: &ScanResult, b: &ScanResult) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) status (fail -> pass)
    // 2) severity (error -> warning -> info)
    // 3) location path, then start line (missing last)
    // 4) rule code
    // 5) resource address
    // 6) description
    a.status
        .cmp(&b.status)
        .then(b.severity.cmp(&a.severity))
        .then(a.location.path.cmp(&b.location.path))
        .then(
            a.location
                .start_line
                .unwrap_or(u32::MAX)
                .cmp(&b.location.start_line.unwrap_or(u32::MAX)),
        )
        .then(a.rule_code.cmp(&b.rule_code))
        .then(a.resource.cmp(&b.resource))
        .then(a.description.cmp(&b.description))
}
