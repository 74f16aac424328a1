use super::defaults::{AttrDefault, effective};
use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::model::Block;
use crate::normalize::Scalar;
use serde_json::json;
use tfguard_types::{Severity, ids};

pub const ACL: AttrDefault = AttrDefault::text("acl", "private");

const PUBLIC_ACLS: &[&str] = &["public-read", "public-read-write", "website"];

pub static PUBLIC_ACL: CheckDef = CheckDef {
    rule_code: ids::RULE_AWS_S3_PUBLIC_ACL,
    check_id: ids::CHECK_AWS_S3_PUBLIC_ACL,
    provider: Provider::Aws,
    title: "S3 buckets must not use a public ACL",
    default_severity: Severity::Error,
    targets: &[Target::TopLevel("aws_s3_bucket")],
    evaluate,
};

fn evaluate(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    let acl = effective(ctx, block, &ACL);
    let Scalar::Text(text) = &acl else {
        return None;
    };
    if PUBLIC_ACLS.iter().any(|p| acl.text_eq_ignore_case(p)) {
        Some(
            Verdict::fail(format!("bucket has a public ACL '{}'", text.trim()))
                .with_data(json!({ "acl": text.trim() })),
        )
    } else {
        Some(Verdict::pass("bucket ACL is not public"))
    }
}
