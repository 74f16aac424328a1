//! In-memory block model handed over by the parsing layer.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use tfguard_types::SourceRange;

/// A typed configuration unit: `resource "azurerm_network_security_rule" "rdp" { ... }`
/// is a block of type `azurerm_network_security_rule` named `rdp`. Nested
/// sub-blocks (`security_rule { ... }`) are children whose name is usually empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, rename = "type")]
    pub block_type: String,

    #[serde(default)]
    pub name: String,

    /// Attribute lookup is case-sensitive and exact.
    #[serde(default, with = "attribute_map")]
    pub attributes: BTreeMap<String, Attribute>,

    /// Declaration order is preserved.
    #[serde(default, rename = "blocks")]
    pub children: Vec<Block>,

    #[serde(default)]
    pub range: SourceRange,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Value,
    pub range: SourceRange,
}

/// Attribute values as the parser saw them. `Reference`s are replaced by the
/// resolver before any predicate compares them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Literal(Literal),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Reference(Reference),
    #[default]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(Number),
    String(String),
}

/// A dotted path into another block, e.g. `azurerm_resource_group.main.location`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReferenceRepr", into = "String")]
pub struct Reference {
    pub path: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceRepr {
    Dotted(String),
    Segments(Vec<String>),
}

impl From<ReferenceRepr> for Reference {
    fn from(repr: ReferenceRepr) -> Self {
        match repr {
            ReferenceRepr::Dotted(s) => Reference::parse(&s),
            ReferenceRepr::Segments(path) => Reference { path },
        }
    }
}

impl From<Reference> for String {
    fn from(r: Reference) -> Self {
        r.to_string()
    }
}

impl Reference {
    pub fn parse(dotted: &str) -> Self {
        Reference {
            path: dotted
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path.join("."))
    }
}

impl Block {
    pub fn new(block_type: impl Into<String>, name: impl Into<String>) -> Self {
        Block {
            block_type: block_type.into(),
            name: name.into(),
            ..Block::default()
        }
    }

    /// A nested sub-block such as `security_rule { ... }`.
    pub fn nested(block_type: impl Into<String>) -> Self {
        Block::new(block_type, "")
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(
            name.to_string(),
            Attribute {
                name: name.to_string(),
                value: value.into(),
                range: self.range.clone(),
            },
        );
        self
    }

    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = range;
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Nested blocks of one type, in declaration order.
    pub fn get_blocks<'a>(&'a self, child_type: &str) -> impl Iterator<Item = &'a Block> {
        self.children
            .iter()
            .filter(move |c| c.block_type == child_type)
    }

    /// `type.name`, or just `type` for unnamed nested blocks.
    pub fn address(&self) -> String {
        if self.name.is_empty() {
            self.block_type.clone()
        } else {
            format!("{}.{}", self.block_type, self.name)
        }
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Literal(Literal::String(s.into()))
    }

    pub fn number(n: i64) -> Self {
        Value::Literal(Literal::Number(Number::from(n)))
    }

    pub fn boolean(b: bool) -> Self {
        Value::Literal(Literal::Bool(b))
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn reference(dotted: &str) -> Self {
        Value::Reference(Reference::parse(dotted))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    /// True when no `Reference` remains anywhere inside the value.
    pub fn is_fully_resolved(&self) -> bool {
        match self {
            Value::Reference(_) => false,
            Value::List(items) => items.iter().all(Value::is_fully_resolved),
            Value::Map(entries) => entries.values().all(Value::is_fully_resolved),
            Value::Literal(_) | Value::Unknown => true,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n)
    }
}

/// Attributes travel as `{ "name": { "value": ..., "range": ... } }`; the map
/// key becomes `Attribute::name`.
mod attribute_map {
    use super::{Attribute, Value};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;
    use tfguard_types::SourceRange;

    #[derive(Serialize, Deserialize)]
    struct Wire {
        value: Value,
        #[serde(default)]
        range: SourceRange,
    }

    #[derive(Serialize)]
    struct WireRef<'a> {
        value: &'a Value,
        range: &'a SourceRange,
    }

    pub fn serialize<S: Serializer>(
        attrs: &BTreeMap<String, Attribute>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        let wire: BTreeMap<&str, WireRef<'_>> = attrs
            .iter()
            .map(|(k, a)| {
                (
                    k.as_str(),
                    WireRef {
                        value: &a.value,
                        range: &a.range,
                    },
                )
            })
            .collect();
        wire.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<BTreeMap<String, Attribute>, D::Error> {
        let wire = BTreeMap::<String, Wire>::deserialize(de)?;
        Ok(wire
            .into_iter()
            .map(|(name, w)| {
                let attr = Attribute {
                    name: name.clone(),
                    value: w.value,
                    range: w.range,
                };
                (name, attr)
            })
            .collect())
    }
}
