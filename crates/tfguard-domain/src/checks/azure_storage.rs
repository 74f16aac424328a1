use super::defaults::{AttrDefault, effective};
use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::model::Block;
use crate::normalize::Scalar;
use serde_json::json;
use tfguard_types::{Severity, ids};

pub const HTTPS_ONLY: AttrDefault = AttrDefault::boolean("enable_https_traffic_only", true);
pub const MIN_TLS_VERSION: AttrDefault = AttrDefault::text("min_tls_version", "TLS1_0");

const ACCEPTED_TLS: &[&str] = &["TLS1_2", "TLS1_3"];
const TARGETS: &[Target] = &[Target::TopLevel("azurerm_storage_account")];

pub static STORAGE_HTTPS: CheckDef = CheckDef {
    rule_code: ids::RULE_AZU_STORAGE_HTTPS,
    check_id: ids::CHECK_AZURE_STORAGE_HTTPS,
    provider: Provider::Azure,
    title: "Storage accounts must only accept HTTPS traffic",
    default_severity: Severity::Error,
    targets: TARGETS,
    evaluate: evaluate_https,
};

pub static STORAGE_MIN_TLS: CheckDef = CheckDef {
    rule_code: ids::RULE_AZU_STORAGE_MIN_TLS,
    check_id: ids::CHECK_AZURE_STORAGE_MIN_TLS,
    provider: Provider::Azure,
    title: "Storage accounts must require TLS 1.2 or later",
    default_severity: Severity::Warning,
    targets: TARGETS,
    evaluate: evaluate_min_tls,
};

fn evaluate_https(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    match effective(ctx, block, &HTTPS_ONLY).as_bool()? {
        true => Some(Verdict::pass("storage account only accepts HTTPS")),
        false => Some(Verdict::fail("storage account accepts plain HTTP traffic")),
    }
}

fn evaluate_min_tls(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    let version = effective(ctx, block, &MIN_TLS_VERSION);
    let Scalar::Text(text) = &version else {
        return None;
    };
    if ACCEPTED_TLS.iter().any(|v| version.text_eq_ignore_case(v)) {
        Some(Verdict::pass("storage account requires TLS 1.2 or later"))
    } else {
        Some(
            Verdict::fail(format!(
                "storage account accepts TLS versions older than 1.2 (min_tls_version = {})",
                text.trim()
            ))
            .with_data(json!({ "min_tls_version": text.trim() })),
        )
    }
}
