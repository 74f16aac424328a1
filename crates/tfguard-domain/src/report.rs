use tfguard_types::{Diagnostic, ScanResult, ScanSummary, Status, Verdict};

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub results: Vec<ScanResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ScanSummary,
}

impl DomainReport {
    pub fn failures(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.status == Status::Fail)
    }

    pub fn has_failure(&self, rule_code: &str) -> bool {
        self.failures().any(|r| r.rule_code == rule_code)
    }
}
