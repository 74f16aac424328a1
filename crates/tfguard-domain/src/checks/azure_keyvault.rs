use super::defaults::{AttrDefault, effective};
use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::model::Block;
use tfguard_types::{Severity, ids};

pub const DEFAULT_ACTION: AttrDefault = AttrDefault::required("default_action");

pub static NETWORK_ACL_DENY: CheckDef = CheckDef {
    rule_code: ids::RULE_AZU_KEYVAULT_ACL,
    check_id: ids::CHECK_AZURE_KEYVAULT_ACL,
    provider: Provider::Azure,
    title: "Key vault network ACLs must deny by default",
    default_severity: Severity::Warning,
    targets: &[Target::Nested {
        parent: "azurerm_key_vault",
        child: "network_acls",
    }],
    evaluate,
};

fn evaluate(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    let action = effective(ctx, block, &DEFAULT_ACTION);
    if action.is_unknown() {
        return None;
    }
    if action.text_eq_ignore_case("deny") {
        Some(Verdict::pass("network ACL denies by default"))
    } else {
        Some(Verdict::fail("network ACL allows traffic by default"))
    }
}
