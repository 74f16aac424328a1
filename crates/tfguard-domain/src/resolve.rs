//! Cross-block reference resolution.
//!
//! A reference `type.name.attr[.segment...]` resolves to the value of `attr` on
//! the block `(type, name)`, following further segments into maps, lists and
//! nested blocks. Resolution repeats until no reference remains. Anything it
//! cannot reach becomes `Value::Unknown`; resolution never fails.

use crate::graph::FrozenGraph;
use crate::model::{Block, Reference, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Read-only view over a frozen graph. Cheap to copy, safe to share.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'g> {
    graph: &'g FrozenGraph,
    max_depth: usize,
}

/// `(block type, block name, attribute)` of a reference being followed.
type StackKey<'g> = (&'g str, &'g str, &'g str);

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g FrozenGraph, max_depth: usize) -> Self {
        Self { graph, max_depth }
    }

    pub fn graph(&self) -> &'g FrozenGraph {
        self.graph
    }

    /// Resolve every reference inside `value`. The result contains no `Reference`.
    pub fn resolve(&self, value: &Value) -> Value {
        let mut stack = Vec::new();
        self.resolve_inner(value, &mut stack, 0)
    }

    fn resolve_inner(&self, value: &Value, stack: &mut Vec<StackKey<'g>>, depth: usize) -> Value {
        match value {
            Value::Literal(_) | Value::Unknown => value.clone(),
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|v| self.resolve_inner(v, stack, depth))
                    .collect(),
            ),
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.resolve_inner(v, stack, depth)))
                    .collect(),
            ),
            Value::Reference(reference) => self.follow(reference, stack, depth),
        }
    }

    fn follow(&self, reference: &Reference, stack: &mut Vec<StackKey<'g>>, depth: usize) -> Value {
        if depth >= self.max_depth {
            tracing::debug!(
                %reference,
                max_depth = self.max_depth,
                "reference depth limit reached"
            );
            return Value::Unknown;
        }

        let Some((block, rest, key)) = self.target(reference) else {
            tracing::debug!(%reference, "reference target not found");
            return Value::Unknown;
        };

        if stack.contains(&key) {
            tracing::debug!(%reference, "reference cycle");
            return Value::Unknown;
        }

        let Some(found) = walk_block(block, &rest) else {
            tracing::debug!(%reference, "reference path not found in target block");
            return Value::Unknown;
        };

        stack.push(key);
        let resolved = self.resolve_inner(&found, stack, depth + 1);
        stack.pop();
        resolved
    }

    /// The block a reference points into, the path left to walk inside it,
    /// and the key that identifies it on the cycle stack.
    fn target<'r>(
        &self,
        reference: &'r Reference,
    ) -> Option<(&'g Block, Cow<'r, [String]>, StackKey<'g>)> {
        let path = reference.path.as_slice();
        match path {
            [root, name, rest @ ..] if root == "var" => {
                let block = self.graph.lookup("variable", name)?;
                let mut walk = Vec::with_capacity(rest.len() + 1);
                walk.push("default".to_string());
                walk.extend(rest.iter().cloned());
                let key = (block.block_type.as_str(), block.name.as_str(), "default");
                Some((block, Cow::Owned(walk), key))
            }
            [root, name, ..] if root == "local" => {
                let (block, local) = self
                    .graph
                    .locals()
                    .find_map(|b| b.attributes.get_key_value(name).map(|(k, _)| (b, k)))?;
                let key = ("local", "", local.as_str());
                Some((block, Cow::Borrowed(&path[1..]), key))
            }
            [block_type, name, rest @ ..] => {
                let block = self.graph.lookup(block_type, name)?;
                let attr = rest
                    .first()
                    .and_then(|head| block.attributes.get_key_value(head))
                    .map_or("", |(k, _)| k.as_str());
                let key = (block.block_type.as_str(), block.name.as_str(), attr);
                Some((block, Cow::Borrowed(rest), key))
            }
            _ => None,
        }
    }
}

/// Walk `path` from a block: attribute first, then nested blocks.
fn walk_block<'g>(block: &'g Block, path: &[String]) -> Option<Cow<'g, Value>> {
    let Some((head, rest)) = path.split_first() else {
        return Some(Cow::Owned(block_as_value(block)));
    };

    if let Some(attr) = block.get_attribute(head) {
        return walk_value(&attr.value, rest).map(Cow::Borrowed);
    }

    let mut children = block.get_blocks(head);
    match rest.split_first() {
        Some((index, tail)) if index.parse::<usize>().is_ok() => {
            let i = index.parse::<usize>().ok()?;
            walk_block(children.nth(i)?, tail)
        }
        _ => walk_block(children.next()?, rest),
    }
}

fn walk_value<'g>(value: &'g Value, path: &[String]) -> Option<&'g Value> {
    let Some((head, rest)) = path.split_first() else {
        return Some(value);
    };
    match value {
        Value::Map(entries) => walk_value(entries.get(head)?, rest),
        Value::List(items) => walk_value(items.get(head.parse::<usize>().ok()?)?, rest),
        // Segments past a reference are not followed.
        Value::Literal(_) | Value::Reference(_) | Value::Unknown => None,
    }
}

/// A whole block as a map of its attributes; nested blocks are omitted.
fn block_as_value(block: &Block) -> Value {
    let entries: BTreeMap<String, Value> = block
        .attributes
        .iter()
        .map(|(k, a)| (k.clone(), a.value.clone()))
        .collect();
    Value::Map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FrozenGraph;

    fn graph(blocks: Vec<Block>) -> FrozenGraph {
        let (graph, errors) = FrozenGraph::from_blocks(blocks);
        assert!(errors.is_empty());
        graph
    }

    #[test]
    fn resolves_one_hop() {
        let g = graph(vec![
            Block::new("azurerm_network_security_rule", "shared")
                .with_attr("source_address_prefix", "*"),
        ]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(
            r.resolve(&Value::reference(
                "azurerm_network_security_rule.shared.source_address_prefix"
            )),
            Value::string("*")
        );
    }

    #[test]
    fn resolves_chains_within_the_depth_limit() {
        let mut blocks = Vec::new();
        for i in 0..10 {
            blocks.push(
                Block::new("hop", i.to_string())
                    .with_attr("next", Value::reference(&format!("hop.{}.next", i + 1))),
            );
        }
        blocks.push(Block::new("hop", "10").with_attr("next", "0.0.0.0/0"));
        let g = graph(blocks);

        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(r.resolve(&Value::reference("hop.1.next")), Value::string("0.0.0.0/0"));

        // Eleven hops from hop.0 exceed the default limit of ten.
        assert_eq!(r.resolve(&Value::reference("hop.0.next")), Value::Unknown);
        let deeper = Resolver::new(&g, 11);
        assert_eq!(deeper.resolve(&Value::reference("hop.0.next")), Value::string("0.0.0.0/0"));
    }

    #[test]
    fn two_block_cycle_is_unknown() {
        let g = graph(vec![
            Block::new("a", "x").with_attr("v", Value::reference("b.y.v")),
            Block::new("b", "y").with_attr("v", Value::reference("a.x.v")),
        ]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(r.resolve(&Value::reference("a.x.v")), Value::Unknown);
    }

    #[test]
    fn missing_block_or_attribute_is_unknown() {
        let g = graph(vec![Block::new("a", "x").with_attr("v", "1")]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(r.resolve(&Value::reference("a.nope.v")), Value::Unknown);
        assert_eq!(r.resolve(&Value::reference("a.x.nope")), Value::Unknown);
        assert_eq!(r.resolve(&Value::reference("a")), Value::Unknown);
    }

    #[test]
    fn block_type_lookup_is_case_sensitive() {
        let g = graph(vec![Block::new("a", "x").with_attr("v", "1")]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(r.resolve(&Value::reference("A.x.v")), Value::Unknown);
    }

    #[test]
    fn resolves_variables_and_locals() {
        let g = graph(vec![
            Block::new("variable", "admin_cidr").with_attr("default", "internet"),
            Block::nested("locals").with_attr("ports", Value::list(["22", "3389"])),
        ]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(r.resolve(&Value::reference("var.admin_cidr")), Value::string("internet"));
        assert_eq!(r.resolve(&Value::reference("local.ports")), Value::list(["22", "3389"]));
        assert_eq!(r.resolve(&Value::reference("local.ports.1")), Value::string("3389"));
        assert_eq!(r.resolve(&Value::reference("var.missing")), Value::Unknown);
    }

    #[test]
    fn locals_may_reference_other_locals() {
        let g = graph(vec![
            Block::nested("locals")
                .with_attr("any_cidr", "0.0.0.0/0")
                .with_attr("admin_source", Value::reference("local.any_cidr")),
        ]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(
            r.resolve(&Value::reference("local.admin_source")),
            Value::string("0.0.0.0/0")
        );
    }

    #[test]
    fn attributes_of_one_block_may_reference_each_other() {
        let g = graph(vec![
            Block::new("a", "x")
                .with_attr("v1", Value::reference("a.x.v2"))
                .with_attr("v2", "internet"),
            Block::new("variable", "office").with_attr("default", Value::reference("var.office")),
            Block::nested("locals")
                .with_attr("ping", Value::reference("local.pong"))
                .with_attr("pong", Value::reference("local.ping")),
        ]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        assert_eq!(r.resolve(&Value::reference("a.x.v1")), Value::string("internet"));
        assert_eq!(r.resolve(&Value::reference("var.office")), Value::Unknown);
        assert_eq!(r.resolve(&Value::reference("local.ping")), Value::Unknown);
    }

    #[test]
    fn walks_maps_lists_and_nested_blocks() {
        let mut tags = BTreeMap::new();
        tags.insert("zone".to_string(), Value::string("dmz"));
        let g = graph(vec![
            Block::new("azurerm_network_security_group", "web")
                .with_attr("tags", Value::Map(tags))
                .with_child(
                    Block::nested("security_rule").with_attr("source_address_prefix", "10.0.0.1"),
                )
                .with_child(Block::nested("security_rule").with_attr("source_address_prefix", "*")),
        ]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);

        assert_eq!(
            r.resolve(&Value::reference("azurerm_network_security_group.web.tags.zone")),
            Value::string("dmz")
        );
        assert_eq!(
            r.resolve(&Value::reference(
                "azurerm_network_security_group.web.security_rule.1.source_address_prefix"
            )),
            Value::string("*")
        );
        assert_eq!(
            r.resolve(&Value::reference(
                "azurerm_network_security_group.web.security_rule.source_address_prefix"
            )),
            Value::string("10.0.0.1")
        );
    }

    #[test]
    fn references_inside_lists_resolve_deeply() {
        let g = graph(vec![Block::new("variable", "office").with_attr("default", "4.53.160.75")]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        let resolved = r.resolve(&Value::List(vec![
            Value::string("10.0.0.0/8"),
            Value::reference("var.office"),
            Value::reference("var.nowhere"),
        ]));
        assert!(resolved.is_fully_resolved());
        assert_eq!(
            resolved,
            Value::List(vec![
                Value::string("10.0.0.0/8"),
                Value::string("4.53.160.75"),
                Value::Unknown
            ])
        );
    }

    #[test]
    fn resolution_is_repeatable() {
        let g = graph(vec![Block::new("variable", "v").with_attr("default", "any")]);
        let r = Resolver::new(&g, DEFAULT_MAX_DEPTH);
        let v = Value::reference("var.v");
        assert_eq!(r.resolve(&v), r.resolve(&v));
    }
}
