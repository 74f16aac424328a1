use tfguard_domain::policy::{EffectiveConfig, FailOn};
use tfguard_types::Severity;

pub const PROFILES: &[&str] = &["strict", "warn", "audit"];

/// Preset profiles are opinionated defaults. Anything complex belongs in repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        "strict" => Ok(strict_profile()),
        "warn" => Ok(warn_profile()),
        "audit" => Ok(audit_profile()),
        other => anyhow::bail!("unknown profile: {other} (expected strict|warn|audit)"),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig::from_registry("strict", |c| c.default_severity)
}

// Findings are reported but only an explicit `fail_on = "warning"` fails the run.
fn warn_profile() -> EffectiveConfig {
    let mut cfg = EffectiveConfig::from_registry("warn", |_| Severity::Warning);
    cfg.fail_on = FailOn::Error;
    cfg
}

fn audit_profile() -> EffectiveConfig {
    let mut cfg = EffectiveConfig::from_registry("audit", |_| Severity::Info);
    cfg.include_passed = true;
    cfg
}
