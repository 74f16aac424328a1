//! Pure rule evaluation over a block graph (no IO).
//!
//! Input: blocks built elsewhere, frozen into a [`FrozenGraph`].
//! Output: per-unit results, diagnostics, a verdict and summary data.

#![forbid(unsafe_code)]

pub mod checks;
pub mod exposure;
pub mod fingerprint;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod report;
pub mod resolve;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{CancelFlag, scan, scan_with_cancel};
pub use graph::{FrozenGraph, GraphBuilder, GraphError};
pub use model::{Attribute, Block, Literal, Reference, Value};
pub use policy::{CheckPolicy, EffectiveConfig, FailOn};
pub use report::DomainReport;
pub use resolve::{DEFAULT_MAX_DEPTH, Resolver};
