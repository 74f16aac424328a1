use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::exposure::{Exposure, classify_exposure};
use crate::model::Block;
use crate::normalize::{Expect, Scalar};
use serde_json::json;
use tfguard_types::{Severity, ids};

const RULE_RESOURCE: &str = "aws_security_group_rule";
const CIDR_ATTRIBUTES: &[&str] = &["cidr_blocks", "ipv6_cidr_blocks"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Ingress,
    Egress,
}

impl Flow {
    fn keyword(self) -> &'static str {
        match self {
            Flow::Ingress => "ingress",
            Flow::Egress => "egress",
        }
    }
}

pub static PUBLIC_INGRESS: CheckDef = CheckDef {
    rule_code: ids::RULE_AWS_PUBLIC_INGRESS,
    check_id: ids::CHECK_AWS_PUBLIC_INGRESS,
    provider: Provider::Aws,
    title: "Security group rules must not allow ingress from a public range",
    default_severity: Severity::Error,
    targets: &[
        Target::TopLevel(RULE_RESOURCE),
        Target::Nested {
            parent: "aws_security_group",
            child: "ingress",
        },
    ],
    evaluate: evaluate_ingress,
};

pub static PUBLIC_EGRESS: CheckDef = CheckDef {
    rule_code: ids::RULE_AWS_PUBLIC_EGRESS,
    check_id: ids::CHECK_AWS_PUBLIC_EGRESS,
    provider: Provider::Aws,
    title: "Security group rules should not allow egress to a public range",
    default_severity: Severity::Warning,
    targets: &[
        Target::TopLevel(RULE_RESOURCE),
        Target::Nested {
            parent: "aws_security_group",
            child: "egress",
        },
    ],
    evaluate: evaluate_egress,
};

fn evaluate_ingress(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    evaluate_flow(ctx, block, Flow::Ingress)
}

fn evaluate_egress(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    evaluate_flow(ctx, block, Flow::Egress)
}

fn evaluate_flow(ctx: &EvalContext<'_>, block: &Block, flow: Flow) -> Option<Verdict> {
    // Standalone rules say which way they point; nested blocks are named for it.
    let direction = if block.block_type == RULE_RESOURCE {
        ctx.normalized(block, "type", Expect::Scalar)?.single()
    } else {
        Scalar::Text(block.block_type.clone())
    };
    if !direction.text_eq_ignore_case(flow.keyword()) {
        return None;
    }

    let Some(cidrs) = ctx.candidates_from(block, CIDR_ATTRIBUTES) else {
        return Some(Verdict::pass(format!(
            "{} rule has no CIDR ranges",
            flow.keyword()
        )));
    };

    let data = json!({ "flow": flow.keyword() });
    match classify_exposure(&cidrs) {
        Exposure::Open => Some(
            Verdict::fail(match flow {
                Flow::Ingress => "security group rule allows ingress from a public CIDR",
                Flow::Egress => "security group rule allows egress to a public CIDR",
            })
            .with_data(data),
        ),
        Exposure::Restricted => Some(
            Verdict::pass(format!(
                "{} rule is limited to specific CIDR ranges",
                flow.keyword()
            ))
            .with_data(data),
        ),
        Exposure::Unknown => None,
    }
}
