use super::defaults::{AttrDefault, effective};
use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::exposure::{Exposure, classify_exposure};
use crate::model::Block;
use crate::normalize::Scalar;
use tfguard_types::{Severity, ids};

pub const DIRECTION: AttrDefault = AttrDefault::text("direction", "INGRESS");

pub static PUBLIC_INGRESS: CheckDef = CheckDef {
    rule_code: ids::RULE_GCP_PUBLIC_INGRESS,
    check_id: ids::CHECK_GCP_PUBLIC_INGRESS,
    provider: Provider::Google,
    title: "Firewalls must not allow ingress from the internet",
    default_severity: Severity::Error,
    targets: &[Target::TopLevel("google_compute_firewall")],
    evaluate,
};

fn evaluate(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    match effective(ctx, block, &DIRECTION) {
        Scalar::Unknown => return None,
        d if !d.text_eq_ignore_case("ingress") => {
            return Some(Verdict::pass("firewall applies to egress traffic"));
        }
        _ => {}
    }

    let Some(ranges) = ctx.candidates_from(block, &["source_ranges"]) else {
        return Some(Verdict::pass("firewall has no source ranges"));
    };
    match classify_exposure(&ranges) {
        Exposure::Open => Some(Verdict::fail("firewall allows ingress from the internet")),
        Exposure::Restricted => Some(Verdict::pass("firewall source ranges are restricted")),
        Exposure::Unknown => None,
    }
}
