//! The `explain` use case: look up rule documentation.

use tfguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes available rule codes and check ids.
    NotFound {
        identifier: String,
        available_rule_codes: &'static [&'static str],
        available_check_ids: &'static [&'static str],
    },
}

/// Look up an explanation for a rule code or check id.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_codes: explain::all_rule_codes(),
            available_check_ids: explain::all_check_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before (violation):\n");
    out.push_str("```hcl\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After (fixed):\n");
    out.push_str("```hcl\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, rule_codes: &[&str], check_ids: &[&str]) -> String {
    let mut out = format!("Unknown rule code or check id: {identifier}\n\n");

    out.push_str("Available rule codes:\n");
    for code in rule_codes {
        out.push_str(&format!("  - {code}\n"));
    }
    out.push_str("\nAvailable check ids:\n");
    for id in check_ids {
        out.push_str(&format!("  - {id}\n"));
    }

    out
}
