//! Value normalization: resolved values in, comparable scalars out.
//!
//! Numbers become their canonical decimal string. Booleans stay booleans.
//! Anything the engine cannot compare (maps, leftover references, unknowns)
//! becomes `Unknown`, which never matches a concrete value.

use crate::model::{Literal, Value};
use serde_json::Number;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Bool(bool),
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Normalized {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Unknown,
}

/// What shape the caller wants a literal in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// A literal stays a scalar.
    Scalar,
    /// A literal becomes a one-element list of candidates.
    List,
}

/// Normalize a resolved value. Lists are always flattened, whatever the
/// caller expects, so `["80", ["443", "3389"]]` yields three candidates.
pub fn normalize(value: &Value, expect: Expect) -> Normalized {
    match value {
        Value::Literal(lit) => {
            let scalar = literal_scalar(lit);
            match expect {
                Expect::Scalar => Normalized::Scalar(scalar),
                Expect::List => Normalized::List(vec![scalar]),
            }
        }
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            flatten_into(items, &mut out);
            Normalized::List(out)
        }
        Value::Map(_) | Value::Reference(_) | Value::Unknown => Normalized::Unknown,
    }
}

fn flatten_into(items: &[Value], out: &mut Vec<Scalar>) {
    for item in items {
        match item {
            Value::Literal(lit) => out.push(literal_scalar(lit)),
            Value::List(nested) => flatten_into(nested, out),
            Value::Map(_) | Value::Reference(_) | Value::Unknown => out.push(Scalar::Unknown),
        }
    }
}

fn literal_scalar(lit: &Literal) -> Scalar {
    match lit {
        Literal::String(s) => Scalar::Text(s.clone()),
        Literal::Number(n) => Scalar::Text(canonical_number(n)),
        Literal::Bool(b) => Scalar::Bool(*b),
    }
}

/// `3389`, `3389.0` and `3.389e3` all compare as `"3389"`.
pub fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            format!("{}", f as i64)
        }
        Some(f) => format!("{f}"),
        None => n.to_string(),
    }
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Scalar::Unknown)
    }

    /// Semantic equality: `Unknown` never equals anything, itself included.
    pub fn same_as(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            _ => false,
        }
    }

    /// Trimmed, ASCII case-insensitive text comparison.
    pub fn text_eq_ignore_case(&self, expected: &str) -> bool {
        self.as_text()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(expected))
    }

    /// Booleans and their common string spellings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Scalar::Unknown => None,
        }
    }
}

impl Normalized {
    /// Candidate scalars, or `None` when the whole value is unknown.
    pub fn candidates(&self) -> Option<&[Scalar]> {
        match self {
            Normalized::Scalar(s) => Some(std::slice::from_ref(s)),
            Normalized::List(items) => Some(items.as_slice()),
            Normalized::Unknown => None,
        }
    }

    /// A single scalar: the scalar itself, or the only element of a one-item list.
    pub fn single(&self) -> Scalar {
        match self {
            Normalized::Scalar(s) => s.clone(),
            Normalized::List(items) if items.len() == 1 => items[0].clone(),
            _ => Scalar::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Normalized::Unknown)
    }

    /// Concatenate candidates. An unknown part contributes an unknown element.
    pub fn concat<I: IntoIterator<Item = Normalized>>(parts: I) -> Normalized {
        let mut out = Vec::new();
        for part in parts {
            match part {
                Normalized::Scalar(s) => out.push(s),
                Normalized::List(items) => out.extend(items),
                Normalized::Unknown => out.push(Scalar::Unknown),
            }
        }
        Normalized::List(out)
    }
}
