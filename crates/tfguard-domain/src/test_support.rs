use crate::checks::{self, EvalContext, Verdict};
use crate::engine::{collect_units, evaluate_unit};
use crate::graph::FrozenGraph;
use crate::model::{Block, Value};
use crate::policy::{CheckPolicy, EffectiveConfig};
use crate::resolve::{DEFAULT_MAX_DEPTH, Resolver};
use tfguard_types::{Severity, Status};

pub fn graph(blocks: Vec<Block>) -> FrozenGraph {
    let (graph, errors) = FrozenGraph::from_blocks(blocks);
    assert!(errors.is_empty(), "fixture blocks rejected: {errors:?}");
    graph
}

/// Config with only `rule_code` enabled.
pub fn config_with_rule(rule_code: &str, severity: Severity) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::from_registry("test", |c| c.default_severity);
    for (code, policy) in cfg.checks.iter_mut() {
        *policy = if code == rule_code {
            CheckPolicy::enabled(severity)
        } else {
            CheckPolicy::disabled()
        };
    }
    cfg
}

/// A standalone network security rule allowing inbound TCP to `port` from `source`.
pub fn nsr(name: &str, port: &str, source: impl Into<Value>) -> Block {
    Block::new("azurerm_network_security_rule", name)
        .with_attr("name", name)
        .with_attr("priority", Value::number(100))
        .with_attr("direction", "Inbound")
        .with_attr("access", "Allow")
        .with_attr("protocol", "Tcp")
        .with_attr("source_port_range", "*")
        .with_attr("destination_port_range", port)
        .with_attr("source_address_prefix", source)
        .with_attr("destination_address_prefix", "*")
}

/// The nested form of [`nsr`].
pub fn security_rule(port: &str, source: impl Into<Value>) -> Block {
    let standalone = nsr("nested", port, source);
    let mut nested = Block::nested("security_rule");
    nested.attributes = standalone.attributes;
    nested
}

pub fn nsg_with_rules(name: &str, rules: Vec<Block>) -> Block {
    rules.into_iter().fold(
        Block::new("azurerm_network_security_group", name),
        Block::with_child,
    )
}

pub fn open_rdp_rule(name: &str) -> Block {
    nsr(name, "3389", "*")
}

pub fn restricted_rdp_rule(name: &str) -> Block {
    nsr(name, "3389", "10.0.0.0/16")
}

/// Evaluate one check directly against `block`, resolving through `blocks`.
pub fn verdict_for(rule_code: &str, blocks: Vec<Block>, block: &Block) -> Option<Verdict> {
    let check = checks::lookup(rule_code).expect("rule registered");
    let g = graph(blocks);
    let ctx = EvalContext::new(Resolver::new(&g, DEFAULT_MAX_DEPTH));
    (check.evaluate)(&ctx, block)
}

pub fn status_for(rule_code: &str, blocks: Vec<Block>, block: &Block) -> Option<Status> {
    verdict_for(rule_code, blocks, block).map(|v| v.status)
}

/// Every unit one check produces over the graph, as `(address, status)`.
pub fn unit_statuses(rule_code: &str, blocks: Vec<Block>) -> Vec<(String, Option<Status>)> {
    let g = graph(blocks);
    let cfg = config_with_rule(rule_code, Severity::Error);
    let ctx = EvalContext::new(Resolver::new(&g, cfg.max_resolve_depth));
    collect_units(&g, &cfg)
        .iter()
        .map(|unit| {
            let status = evaluate_unit(&ctx, unit)
                .expect("check does not panic")
                .map(|v| v.status);
            (unit.address.clone(), status)
        })
        .collect()
}
