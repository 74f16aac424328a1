//! Turning the parser's JSON hand-off into a frozen block graph.

use anyhow::Context;
use serde::Deserialize;
use tfguard_domain::{Block, FrozenGraph, GraphBuilder};
use tfguard_types::{Diagnostic, ids};

/// Accepts a bare array of blocks or `{ "blocks": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum GraphDocument {
    Blocks(Vec<Block>),
    Wrapped { blocks: Vec<Block> },
}

#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: FrozenGraph,
    /// One `configuration_defect` per rejected block or dropped nested block.
    pub diagnostics: Vec<Diagnostic>,
}

pub fn load_graph(json: &str) -> anyhow::Result<LoadedGraph> {
    let doc: GraphDocument = serde_json::from_str(json).context("parse block graph json")?;
    let blocks = match doc {
        GraphDocument::Blocks(blocks) | GraphDocument::Wrapped { blocks } => blocks,
    };

    let mut builder = GraphBuilder::new();
    let mut diagnostics = Vec::new();
    for block in blocks {
        let location = block.range.clone();
        let defects = match builder.push(block) {
            Ok(defects) => defects,
            Err(err) => vec![err],
        };
        for defect in defects {
            tracing::warn!(error = %defect, "block defect");
            diagnostics.push(Diagnostic {
                code: ids::DIAG_CONFIGURATION_DEFECT.to_string(),
                rule_code: None,
                message: defect.to_string(),
                location: Some(location.clone()),
            });
        }
    }

    tracing::debug!(blocks = builder.len(), rejected = diagnostics.len(), "block graph built");
    Ok(LoadedGraph {
        graph: builder.freeze(),
        diagnostics,
    })
}
