//! Network exposure classification.

use crate::normalize::{Normalized, Scalar};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exposure {
    /// Reachable from anywhere.
    Open,
    /// A specific address, range or tag.
    Restricted,
    /// The engine cannot see the value. Predicates do not flag this.
    Unknown,
}

/// Values meaning "everyone", compared after trimming and ASCII case-folding.
/// `::/0` is the IPv6 spelling of `0.0.0.0/0`.
pub const OPEN_SENTINELS: &[&str] = &["*", "0.0.0.0", "0.0.0.0/0", "/0", "internet", "any", "::/0"];

pub fn classify_exposure(value: &Normalized) -> Exposure {
    match value {
        Normalized::Scalar(s) => classify_scalar(s),
        Normalized::List(items) => classify_all(items),
        Normalized::Unknown => Exposure::Unknown,
    }
}

/// Existential over the list: one open entry is enough.
fn classify_all(items: &[Scalar]) -> Exposure {
    let mut all_restricted = true;
    for item in items {
        match classify_scalar(item) {
            Exposure::Open => return Exposure::Open,
            Exposure::Restricted => {}
            Exposure::Unknown => all_restricted = false,
        }
    }
    if all_restricted {
        Exposure::Restricted
    } else {
        Exposure::Unknown
    }
}

pub fn classify_scalar(value: &Scalar) -> Exposure {
    match value {
        Scalar::Text(s) => {
            let folded = s.trim().to_ascii_lowercase();
            if OPEN_SENTINELS.contains(&folded.as_str()) {
                Exposure::Open
            } else {
                Exposure::Restricted
            }
        }
        Scalar::Bool(_) => Exposure::Restricted,
        Scalar::Unknown => Exposure::Unknown,
    }
}
