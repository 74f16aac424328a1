//! Effective values for attributes that may be omitted.
//!
//! Each check declares its defaults as `AttrDefault` constants so they can be
//! read in one place and tested on their own.

use super::EvalContext;
use crate::model::Block;
use crate::normalize::{Expect, Scalar};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    Text(&'static str),
    Bool(bool),
    /// The provider requires the attribute; when it is absent there is no verdict.
    Required,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttrDefault {
    pub attribute: &'static str,
    pub fallback: Fallback,
}

impl AttrDefault {
    pub const fn text(attribute: &'static str, value: &'static str) -> Self {
        Self {
            attribute,
            fallback: Fallback::Text(value),
        }
    }

    pub const fn boolean(attribute: &'static str, value: bool) -> Self {
        Self {
            attribute,
            fallback: Fallback::Bool(value),
        }
    }

    pub const fn required(attribute: &'static str) -> Self {
        Self {
            attribute,
            fallback: Fallback::Required,
        }
    }

    pub fn fallback_scalar(&self) -> Scalar {
        match self.fallback {
            Fallback::Text(s) => Scalar::Text(s.to_string()),
            Fallback::Bool(b) => Scalar::Bool(b),
            Fallback::Required => Scalar::Unknown,
        }
    }
}

/// The attribute's scalar value, or the declared default when it is absent.
/// A present value that is not a single scalar is `Unknown`, never the default.
pub fn effective(ctx: &EvalContext<'_>, block: &Block, default: &AttrDefault) -> Scalar {
    match ctx.normalized(block, default.attribute, Expect::Scalar) {
        None => default.fallback_scalar(),
        Some(normalized) => normalized.single(),
    }
}
