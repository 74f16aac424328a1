//! The `rules` use case: list the compiled-in checks.

use serde::Serialize;
use tfguard_domain::checks::{self, Provider};
use tfguard_types::Severity;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub rule_code: &'static str,
    pub check_id: &'static str,
    pub provider: &'static str,
    pub default_severity: Severity,
    pub title: &'static str,
}

/// Every registered check, sorted by rule code.
pub fn list_rules() -> Vec<RuleInfo> {
    let mut rules: Vec<RuleInfo> = checks::registry()
        .iter()
        .map(|c| RuleInfo {
            rule_code: c.rule_code,
            check_id: c.check_id,
            provider: provider_name(c.provider),
            default_severity: c.default_severity,
            title: c.title,
        })
        .collect();
    rules.sort_by(|a, b| a.rule_code.cmp(b.rule_code));
    rules
}

fn provider_name(provider: Provider) -> &'static str {
    match provider {
        Provider::Azure => "azure",
        Provider::Aws => "aws",
        Provider::Google => "google",
    }
}

pub fn format_rules(rules: &[RuleInfo]) -> String {
    let mut out = String::new();
    for r in rules {
        let severity = match r.default_severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        out.push_str(&format!(
            "{:<8} {:<7} {:<8} {:<36} {}\n",
            r.rule_code, r.provider, severity, r.check_id, r.title
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfguard_types::ids;

    #[test]
    fn rules_are_sorted_and_complete() {
        let rules = list_rules();
        assert_eq!(rules.len(), checks::registry().len());
        assert!(rules.windows(2).all(|w| w[0].rule_code < w[1].rule_code));
    }

    #[test]
    fn formatted_rules_have_one_line_each() {
        let rules = list_rules();
        let text = format_rules(&rules);
        assert_eq!(text.lines().count(), rules.len());
        assert!(text.contains(ids::CHECK_AZURE_NO_PUBLIC_RDP));
    }
}
