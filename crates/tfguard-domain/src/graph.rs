//! Block graph construction and the frozen resolution context.
//!
//! `GraphBuilder` is the `Building` state: blocks are added, nothing is
//! evaluated. `freeze` consumes it and yields a read-only `FrozenGraph`,
//! which is what the scanner and resolver work from.

use crate::model::Block;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("block '{name}' at {path} has an empty type")]
    EmptyType { name: String, path: String },

    #[error("nested block {index} of '{parent}' has an empty type")]
    EmptyNestedType { parent: String, index: usize },
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    blocks: Vec<Block>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one top-level block. A top-level block without a type is rejected
    /// outright. Nested blocks without a type are dropped from their parent,
    /// which is kept; each dropped child is returned as a defect.
    pub fn push(&mut self, mut block: Block) -> Result<Vec<GraphError>, GraphError> {
        if block.block_type.trim().is_empty() {
            return Err(GraphError::EmptyType {
                name: block.name.clone(),
                path: block.range.path.as_str().to_string(),
            });
        }
        let mut defects = Vec::new();
        prune_untyped_children(&mut block, &mut defects);
        self.blocks.push(block);
        Ok(defects)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn freeze(self) -> FrozenGraph {
        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut locals = Vec::new();

        for (i, block) in self.blocks.iter().enumerate() {
            if block.block_type == "locals" {
                locals.push(i);
                continue;
            }
            let by_name = index.entry(block.block_type.clone()).or_default();
            if by_name.contains_key(&block.name) {
                tracing::debug!(
                    block = %block.address(),
                    "duplicate block address; keeping the first declaration"
                );
                continue;
            }
            by_name.insert(block.name.clone(), i);
        }

        FrozenGraph {
            blocks: self.blocks,
            index,
            locals,
        }
    }
}

fn prune_untyped_children(block: &mut Block, defects: &mut Vec<GraphError>) {
    let parent = block.address();
    let mut index = 0;
    block.children.retain(|child| {
        let typed = !child.block_type.trim().is_empty();
        if !typed {
            defects.push(GraphError::EmptyNestedType {
                parent: parent.clone(),
                index,
            });
        }
        index += 1;
        typed
    });
    for child in &mut block.children {
        prune_untyped_children(child, defects);
    }
}

/// Immutable block graph plus the `(type, name) -> block` index used for
/// reference resolution. Safe to share across worker threads.
#[derive(Debug, Default)]
pub struct FrozenGraph {
    blocks: Vec<Block>,
    index: HashMap<String, HashMap<String, usize>>,
    locals: Vec<usize>,
}

impl FrozenGraph {
    /// Build and freeze in one step. Rejected blocks are returned alongside.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> (Self, Vec<GraphError>) {
        let mut builder = GraphBuilder::new();
        let mut errors = Vec::new();
        for block in blocks {
            match builder.push(block) {
                Ok(defects) => errors.extend(defects),
                Err(err) => errors.push(err),
            }
        }
        (builder.freeze(), errors)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Case-sensitive lookup by block type and name.
    pub fn lookup(&self, block_type: &str, name: &str) -> Option<&Block> {
        let i = *self.index.get(block_type)?.get(name)?;
        self.blocks.get(i)
    }

    /// Every `locals { ... }` block, in declaration order.
    pub fn locals(&self) -> impl Iterator<Item = &Block> {
        self.locals.iter().filter_map(|&i| self.blocks.get(i))
    }
}
