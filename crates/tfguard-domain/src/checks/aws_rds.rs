use super::defaults::{AttrDefault, effective};
use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::model::Block;
use tfguard_types::{Severity, ids};

pub const PUBLICLY_ACCESSIBLE: AttrDefault = AttrDefault::boolean("publicly_accessible", false);

pub static PUBLIC_DB: CheckDef = CheckDef {
    rule_code: ids::RULE_AWS_RDS_PUBLIC,
    check_id: ids::CHECK_AWS_RDS_PUBLIC,
    provider: Provider::Aws,
    title: "Database instances must not be publicly accessible",
    default_severity: Severity::Error,
    targets: &[
        Target::TopLevel("aws_db_instance"),
        Target::TopLevel("aws_rds_cluster_instance"),
    ],
    evaluate,
};

fn evaluate(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    match effective(ctx, block, &PUBLICLY_ACCESSIBLE).as_bool()? {
        true => Some(Verdict::fail("database instance is publicly accessible")),
        false => Some(Verdict::pass("database instance is not publicly accessible")),
    }
}
