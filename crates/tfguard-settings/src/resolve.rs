use crate::{model::TfguardConfigV1, presets};
use anyhow::Context;
use tfguard_domain::checks;
use tfguard_domain::policy::{EffectiveConfig, FailOn};
use tfguard_types::Severity;

/// Command-line values; each one beats the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub jobs: Option<u32>,
    pub max_resolve_depth: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: TfguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile)?;

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    if let Some(include_passed) = cfg.include_passed {
        effective.include_passed = include_passed;
    }

    if let Some(depth) = overrides.max_resolve_depth.or(cfg.max_resolve_depth) {
        if depth == 0 {
            anyhow::bail!("max_resolve_depth must be at least 1");
        }
        effective.max_resolve_depth = depth as usize;
    }

    if let Some(jobs) = overrides.jobs.or(cfg.jobs) {
        effective.jobs = jobs as usize;
    }

    if let Some(max) = cfg.max_results {
        effective.max_results = max as usize;
    }

    // per-rule overrides
    for (key, rc) in cfg.rules.iter() {
        let check = checks::lookup(key)
            .with_context(|| format!("unknown rule in [rules]: {key}"))?;
        let entry = effective
            .checks
            .get_mut(check.rule_code)
            .with_context(|| format!("rule {} is not part of profile {profile}", check.rule_code))?;

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {key}"))?;
        }
    }

    Ok(ResolvedConfig { effective })
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use tfguard_domain::resolve::DEFAULT_MAX_DEPTH;
    use tfguard_types::ids;

    fn resolve(toml: &str, overrides: Overrides) -> anyhow::Result<EffectiveConfig> {
        let cfg = parse_config_toml(toml)?;
        Ok(resolve_config(cfg, overrides)?.effective)
    }

    #[test]
    fn empty_config_is_strict_with_defaults() {
        let eff = resolve("", Overrides::default()).expect("resolve");
        assert_eq!(eff.profile, "strict");
        assert_eq!(eff.fail_on, FailOn::Error);
        assert_eq!(eff.max_resolve_depth, DEFAULT_MAX_DEPTH);
        assert!(eff.include_passed);

        let rdp = eff.check_policy(ids::RULE_AZU_NO_PUBLIC_RDP).expect("enabled");
        assert_eq!(rdp.severity, Severity::Error);
    }

    #[test]
    fn top_level_fields_are_applied() {
        let eff = resolve(
            r#"
profile = "warn"
fail_on = "warning"
include_passed = false
max_resolve_depth = 4
jobs = 2
max_results = 50
"#,
            Overrides::default(),
        )
        .expect("resolve");

        assert_eq!(eff.profile, "warn");
        assert_eq!(eff.fail_on, FailOn::Warning);
        assert!(!eff.include_passed);
        assert_eq!(eff.max_resolve_depth, 4);
        assert_eq!(eff.jobs, 2);
        assert_eq!(eff.max_results, 50);
    }

    #[test]
    fn overrides_beat_the_file() {
        let eff = resolve(
            "profile = \"warn\"\njobs = 8\nmax_resolve_depth = 3\n",
            Overrides {
                profile: Some("audit".to_string()),
                jobs: Some(1),
                max_resolve_depth: Some(12),
            },
        )
        .expect("resolve");

        assert_eq!(eff.profile, "audit");
        assert_eq!(eff.jobs, 1);
        assert_eq!(eff.max_resolve_depth, 12);
    }

    #[test]
    fn rule_overrides_accept_codes_and_check_ids() {
        let eff = resolve(
            r#"
[rules.azu024]
severity = "warning"

[rules."aws.s3.no_public_acl"]
enabled = false
"#,
            Overrides::default(),
        )
        .expect("resolve");

        let rdp = eff.check_policy(ids::RULE_AZU_NO_PUBLIC_RDP).expect("enabled");
        assert_eq!(rdp.severity, Severity::Warning);
        assert!(eff.check_policy(ids::RULE_AWS_S3_PUBLIC_ACL).is_none());
    }

    #[test]
    fn unknown_rule_code_is_rejected() {
        let err = resolve("[rules.XYZ999]\nenabled = true\n", Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown rule in [rules]: XYZ999"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(resolve("profile = \"nope\"", Overrides::default()).is_err());
        assert!(resolve("fail_on = \"info\"", Overrides::default()).is_err());
        assert!(resolve("max_resolve_depth = 0", Overrides::default()).is_err());
        assert!(
            resolve("[rules.AZU024]\nseverity = \"fatal\"\n", Overrides::default()).is_err()
        );
    }

    #[test]
    fn config_schema_lists_rules_table() {
        let schema = serde_json::to_value(crate::config_schema()).expect("schema json");
        assert!(schema["properties"]["rules"].is_object());
    }
}
