use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::exposure::{Exposure, classify_scalar};
use crate::model::Block;
use crate::normalize::Expect;
use serde_json::json;
use tfguard_types::{Severity, ids};

const BROADCAST: &str = "255.255.255.255";

pub static PUBLIC_FIREWALL: CheckDef = CheckDef {
    rule_code: ids::RULE_AZU_DB_PUBLIC_FIREWALL,
    check_id: ids::CHECK_AZURE_DB_PUBLIC_FIREWALL,
    provider: Provider::Azure,
    title: "Database firewall rules must not allow the whole internet",
    default_severity: Severity::Error,
    targets: &[
        Target::TopLevel("azurerm_sql_firewall_rule"),
        Target::TopLevel("azurerm_postgresql_firewall_rule"),
        Target::TopLevel("azurerm_mysql_firewall_rule"),
    ],
    evaluate,
};

fn evaluate(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    let start = ctx.normalized(block, "start_ip_address", Expect::Scalar)?.single();
    let end = ctx.normalized(block, "end_ip_address", Expect::Scalar)?.single();
    if start.is_unknown() || end.is_unknown() {
        return None;
    }

    // 0.0.0.0 - 0.0.0.0 is Azure's "allow Azure services" marker, not the internet.
    if classify_scalar(&start) == Exposure::Open && end.text_eq_ignore_case(BROADCAST) {
        Some(
            Verdict::fail("firewall rule allows every IPv4 address").with_data(json!({
                "start_ip_address": start.as_text(),
                "end_ip_address": end.as_text(),
            })),
        )
    } else {
        Some(Verdict::pass("firewall rule covers a limited address range"))
    }
}
