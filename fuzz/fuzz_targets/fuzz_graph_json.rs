//! Fuzz target for block graph loading and scanning.
//!
//! Goal: loading and scanning should **never panic** on any input.
//! Malformed JSON is an error; anything that parses must scan cleanly.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_graph_json
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(loaded) = tfguard_app::load_graph(text) else {
        return;
    };
    let cfg = tfguard_domain::EffectiveConfig {
        jobs: 1,
        ..Default::default()
    };
    let report = tfguard_domain::scan(&loaded.graph, &cfg);
    // A fuzzed graph must never trip the panic guard.
    assert!(report.diagnostics.is_empty());
});
