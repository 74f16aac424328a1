//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Exposure classification of sentinels, addresses and lists
//! - Deny short-circuiting in the exposure predicate
//! - Scan idempotence and nested-rule independence

use crate::engine::scan;
use crate::exposure::{Exposure, OPEN_SENTINELS, classify_exposure};
use crate::model::{Block, Value};
use crate::normalize::{Expect, normalize};
use crate::test_support::{
    config_with_rule, graph, nsg_with_rules, nsr, security_rule, status_for, unit_statuses,
};
use proptest::prelude::*;
use tfguard_types::{Severity, Status, ids};

// ============================================================================
// Strategies
// ============================================================================

/// An open sentinel with arbitrary ASCII casing and surrounding whitespace.
fn arb_sentinel() -> impl Strategy<Value = String> {
    (
        prop::sample::select(OPEN_SENTINELS),
        prop::collection::vec(any::<bool>(), 16),
        0usize..3,
        0usize..3,
    )
        .prop_map(|(sentinel, upper, lead, trail)| {
            let cased: String = sentinel
                .chars()
                .zip(upper.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect();
            format!("{}{}{}", " ".repeat(lead), cased, " ".repeat(trail))
        })
}

/// A specific IPv4 address or CIDR that is never the all-zero address.
fn arb_specific_address() -> impl Strategy<Value = String> {
    (1u8..=223, any::<u8>(), any::<u8>(), any::<u8>(), prop::option::of(8u8..=32)).prop_map(
        |(a, b, c, d, prefix)| match prefix {
            Some(p) => format!("{a}.{b}.{c}.{d}/{p}"),
            None => format!("{a}.{b}.{c}.{d}"),
        },
    )
}

fn arb_source() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_sentinel().prop_map(Value::from),
        arb_specific_address().prop_map(Value::from),
        Just(Value::Unknown),
        Just(Value::reference("var.unset")),
    ]
}

fn arb_field(options: &'static [&'static str]) -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::sample::select(options).prop_map(Value::from),
        Just(Value::Unknown),
        Just(Value::reference("local.missing")),
    ]
}

fn arb_deny() -> impl Strategy<Value = String> {
    prop::sample::select(&["Deny", "deny", "DENY", " Deny "][..]).prop_map(str::to_string)
}

fn text(s: &str) -> crate::normalize::Normalized {
    normalize(&Value::from(s), Expect::Scalar)
}

// ============================================================================
// Classification
// ============================================================================

proptest! {
    #[test]
    fn sentinels_classify_open_in_any_case(sentinel in arb_sentinel()) {
        prop_assert_eq!(classify_exposure(&text(&sentinel)), Exposure::Open);
    }

    #[test]
    fn specific_addresses_classify_restricted(addr in arb_specific_address()) {
        prop_assert_eq!(classify_exposure(&text(&addr)), Exposure::Restricted);
    }

    /// A list is open iff at least one element is open.
    #[test]
    fn list_classification_is_existential(
        addrs in prop::collection::vec(arb_specific_address(), 0..6),
        sentinel in prop::option::of(arb_sentinel()),
        at in any::<prop::sample::Index>(),
    ) {
        let mut items: Vec<Value> = addrs.into_iter().map(Value::from).collect();
        let open = sentinel.is_some();
        if let Some(s) = sentinel {
            let idx = at.index(items.len() + 1);
            items.insert(idx, Value::from(s));
        }

        let expected = if open { Exposure::Open } else { Exposure::Restricted };
        let got = classify_exposure(&normalize(&Value::List(items), Expect::List));
        prop_assert_eq!(got, expected);
    }

    /// An unknown element never makes a restricted list open.
    #[test]
    fn unknown_elements_never_produce_open(
        addrs in prop::collection::vec(arb_specific_address(), 0..4),
    ) {
        let mut items: Vec<Value> = addrs.into_iter().map(Value::from).collect();
        items.push(Value::Unknown);
        let got = classify_exposure(&normalize(&Value::List(items), Expect::List));
        prop_assert_eq!(got, Exposure::Unknown);
    }
}

// ============================================================================
// Predicate and scanner invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Deny wins over every other attribute.
    #[test]
    fn deny_always_passes(
        access in arb_deny(),
        direction in arb_field(&["Inbound", "Outbound", "inbound"]),
        protocol in arb_field(&["Tcp", "Udp", "*", "Icmp"]),
        ports in arb_field(&["3389", "22", "*", "1-65535", "80"]),
        source in arb_source(),
    ) {
        let rule = Block::new("azurerm_network_security_rule", "r")
            .with_attr("access", access.as_str())
            .with_attr("direction", direction)
            .with_attr("protocol", protocol)
            .with_attr("destination_port_range", ports)
            .with_attr("source_address_prefix", source);

        for code in [ids::RULE_AZU_NO_PUBLIC_RDP, ids::RULE_AZU_NO_PUBLIC_SSH] {
            prop_assert_eq!(
                status_for(code, vec![rule.clone()], &rule),
                Some(Status::Pass)
            );
        }
    }

    #[test]
    fn scanning_twice_gives_the_same_results(
        sources in prop::collection::vec(arb_source(), 1..8),
    ) {
        let blocks: Vec<Block> = sources
            .into_iter()
            .enumerate()
            .map(|(i, s)| nsr(&format!("r{i}"), "3389", s))
            .collect();
        let g = graph(blocks);
        let cfg = config_with_rule(ids::RULE_AZU_NO_PUBLIC_RDP, Severity::Error);

        let first = scan(&g, &cfg);
        let second = scan(&g, &cfg);
        prop_assert_eq!(first.results, second.results);
        prop_assert_eq!(first.summary, second.summary);
    }

    /// Each nested rule fails on its own; an open sibling never taints a restricted one.
    #[test]
    fn nested_rules_are_independent(
        opens in prop::collection::vec(any::<bool>(), 1..6),
        sentinel in arb_sentinel(),
        addr in arb_specific_address(),
    ) {
        let rules: Vec<Block> = opens
            .iter()
            .map(|open| {
                let source = if *open { sentinel.clone() } else { addr.clone() };
                security_rule("3389", source)
            })
            .collect();
        let statuses = unit_statuses(
            ids::RULE_AZU_NO_PUBLIC_RDP,
            vec![nsg_with_rules("g", rules)],
        );

        prop_assert_eq!(statuses.len(), opens.len());
        for ((_, status), open) in statuses.iter().zip(&opens) {
            let expected = if *open { Status::Fail } else { Status::Pass };
            prop_assert_eq!(*status, Some(expected));
        }
    }
}
