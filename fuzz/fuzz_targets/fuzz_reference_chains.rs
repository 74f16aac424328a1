//! Fuzz target for reference resolution.
//!
//! Goal: arbitrary reference graphs (chains, cycles, dangling targets) always
//! resolve to a value without a `Reference` left in it, and never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_reference_chains
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tfguard_domain::{Block, FrozenGraph, Resolver, Value};

#[derive(Arbitrary, Debug)]
struct Edge {
    from: u8,
    to: u8,
    literal: Option<String>,
}

fuzz_target!(|input: (Vec<Edge>, u8)| {
    let (edges, depth) = input;
    let blocks = edges.iter().map(|e| {
        let value = match &e.literal {
            Some(s) => Value::from(s.as_str()),
            None => Value::reference(&format!("node.n{}.v", e.to % 16)),
        };
        Block::new("node", format!("n{}", e.from % 16)).with_attr("v", value)
    });
    let (graph, _) = FrozenGraph::from_blocks(blocks);
    let resolver = Resolver::new(&graph, usize::from(depth % 16));

    for n in 0..16 {
        let resolved = resolver.resolve(&Value::reference(&format!("node.n{n}.v")));
        assert!(resolved.is_fully_resolved());
    }
});
