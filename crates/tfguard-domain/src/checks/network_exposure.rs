//! Inbound exposure of a sensitive port through Azure network security rules.
//!
//! The same predicate serves every port in the family; each check fixes the
//! port and protocol. A standalone rule resource and every nested
//! `security_rule` block of a group are separate evaluation units.

use super::defaults::{AttrDefault, effective};
use super::{CheckDef, EvalContext, Provider, Target, Verdict};
use crate::exposure::{Exposure, classify_exposure};
use crate::model::Block;
use crate::normalize::{Expect, Normalized, Scalar};
use serde_json::json;
use tfguard_types::{Severity, ids};

pub const DIRECTION: AttrDefault = AttrDefault::text("direction", "Inbound");
pub const ACCESS: AttrDefault = AttrDefault::text("access", "Allow");

const PROTOCOL: &str = "protocol";
const DESTINATION_PORTS: &[&str] = &["destination_port_range", "destination_port_ranges"];
// Source address decides exposure; destination is usually `*` by design.
const SOURCE_ADDRESSES: &[&str] = &["source_address_prefix", "source_address_prefixes"];

const TARGETS: &[Target] = &[
    Target::TopLevel("azurerm_network_security_rule"),
    Target::Nested {
        parent: "azurerm_network_security_group",
        child: "security_rule",
    },
];

/// One member of the exposure family.
#[derive(Clone, Copy, Debug)]
pub struct SensitivePort {
    pub port: u16,
    pub protocol: &'static str,
    pub service: &'static str,
}

const RDP: SensitivePort = SensitivePort {
    port: 3389,
    protocol: "Tcp",
    service: "RDP",
};

const SSH: SensitivePort = SensitivePort {
    port: 22,
    protocol: "Tcp",
    service: "SSH",
};

pub static AZURE_NO_PUBLIC_RDP: CheckDef = CheckDef {
    rule_code: ids::RULE_AZU_NO_PUBLIC_RDP,
    check_id: ids::CHECK_AZURE_NO_PUBLIC_RDP,
    provider: Provider::Azure,
    title: "RDP access must not be allowed from the internet",
    default_severity: Severity::Error,
    targets: TARGETS,
    evaluate: evaluate_rdp,
};

pub static AZURE_NO_PUBLIC_SSH: CheckDef = CheckDef {
    rule_code: ids::RULE_AZU_NO_PUBLIC_SSH,
    check_id: ids::CHECK_AZURE_NO_PUBLIC_SSH,
    provider: Provider::Azure,
    title: "SSH access must not be allowed from the internet",
    default_severity: Severity::Error,
    targets: TARGETS,
    evaluate: evaluate_ssh,
};

fn evaluate_rdp(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    evaluate_exposure(ctx, block, RDP)
}

fn evaluate_ssh(ctx: &EvalContext<'_>, block: &Block) -> Option<Verdict> {
    evaluate_exposure(ctx, block, SSH)
}

/// Three-valued membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Covers {
    Yes,
    No,
    Unknown,
}

pub fn evaluate_exposure(
    ctx: &EvalContext<'_>,
    block: &Block,
    target: SensitivePort,
) -> Option<Verdict> {
    // Deny can never expose anything, whatever else the rule says.
    match effective(ctx, block, &ACCESS) {
        Scalar::Unknown => return None,
        access if !access.text_eq_ignore_case("allow") => {
            return Some(Verdict::pass("security rule denies traffic"));
        }
        _ => {}
    }

    match effective(ctx, block, &DIRECTION) {
        Scalar::Unknown => return None,
        direction if !direction.text_eq_ignore_case("inbound") => {
            return Some(Verdict::pass("security rule applies to outbound traffic"));
        }
        _ => {}
    }

    if let Some(protocol) = ctx.normalized(block, PROTOCOL, Expect::Scalar) {
        let protocol = protocol.single();
        if protocol.is_unknown() {
            return None;
        }
        if !(protocol.text_eq_ignore_case(target.protocol) || protocol.text_eq_ignore_case("*")) {
            return Some(Verdict::pass(format!(
                "security rule does not cover {} traffic",
                target.protocol.to_ascii_uppercase()
            )));
        }
    }

    let ports = ctx.candidates_from(block, DESTINATION_PORTS)?;
    match port_covered(&ports, target.port) {
        Covers::Unknown => return None,
        Covers::No => {
            return Some(Verdict::pass(format!(
                "security rule does not open port {}",
                target.port
            )));
        }
        Covers::Yes => {}
    }

    let sources = ctx.candidates_from(block, SOURCE_ADDRESSES)?;
    let data = json!({
        "port": target.port,
        "protocol": target.protocol,
        "sources": source_texts(&sources),
    });
    match classify_exposure(&sources) {
        Exposure::Open => Some(
            Verdict::fail(format!(
                "security rule allows {} ({}/{}) from the internet",
                target.service,
                target.port,
                target.protocol.to_ascii_uppercase()
            ))
            .with_data(data),
        ),
        Exposure::Restricted => Some(
            Verdict::pass(format!(
                "security rule restricts {} to specific sources",
                target.service
            ))
            .with_data(data),
        ),
        Exposure::Unknown => None,
    }
}

/// Whether a destination port set includes `port`. Entries may be single
/// ports, `low-high` ranges or `*`.
pub fn port_covered(ports: &Normalized, port: u16) -> Covers {
    let Some(candidates) = ports.candidates() else {
        return Covers::Unknown;
    };
    let mut saw_unknown = false;
    for candidate in candidates {
        match candidate {
            Scalar::Text(entry) if entry_covers(entry, port) => return Covers::Yes,
            Scalar::Text(_) | Scalar::Bool(_) => {}
            Scalar::Unknown => saw_unknown = true,
        }
    }
    if saw_unknown { Covers::Unknown } else { Covers::No }
}

fn entry_covers(entry: &str, port: u16) -> bool {
    let entry = entry.trim();
    if entry == "*" {
        return true;
    }
    if let Some((low, high)) = entry.split_once('-') {
        return match (low.trim().parse::<u16>(), high.trim().parse::<u16>()) {
            (Ok(low), Ok(high)) => (low..=high).contains(&port),
            _ => false,
        };
    }
    entry == port.to_string()
}

fn source_texts(sources: &Normalized) -> Vec<String> {
    sources
        .candidates()
        .unwrap_or_default()
        .iter()
        .map(|s| match s {
            Scalar::Text(t) => t.clone(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Unknown => "<unknown>".to_string(),
        })
        .collect()
}
