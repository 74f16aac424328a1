use crate::checks;
use crate::resolve::DEFAULT_MAX_DEPTH;
use std::collections::BTreeMap;
use tfguard_types::Severity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Keep `Pass` results in the report.
    pub include_passed: bool,
    /// Reference hops before a value becomes unknown.
    pub max_resolve_depth: usize,
    /// Worker threads: `1` is sequential, `0` sizes the pool to the machine.
    pub jobs: usize,
    pub max_results: usize,
    /// Keyed by rule code.
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    /// Every registered check enabled, with its severity chosen by `severity`.
    pub fn from_registry(
        profile: &str,
        severity: impl Fn(&checks::CheckDef) -> Severity,
    ) -> Self {
        let checks = checks::registry()
            .iter()
            .map(|c| (c.rule_code.to_string(), CheckPolicy::enabled(severity(c))))
            .collect();
        Self {
            profile: profile.to_string(),
            fail_on: FailOn::Error,
            include_passed: true,
            max_resolve_depth: DEFAULT_MAX_DEPTH,
            jobs: 0,
            max_results: 1000,
            checks,
        }
    }

    pub fn check_policy(&self, rule_code: &str) -> Option<&CheckPolicy> {
        self.checks.get(rule_code).filter(|p| p.enabled)
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self::from_registry("default", |c| c.default_severity)
    }
}
