//! Typed attributes and attribute containers

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKind {
    String,
    Boolean,
    Integer,
}

/// Attribute identity: a name plus the type of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
}

impl Attribute {
    /// A string-valued attribute.
    pub fn of(name: &str) -> Self {
        Self::typed(name, AttributeKind::String)
    }

    pub fn typed(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::String(_) => AttributeKind::String,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Convert this value to the kind of `attribute`.
    ///
    /// Attributes read from published metadata only carry strings, so a string
    /// value is parsed when the attribute is typed. Values that cannot be
    /// converted are returned unchanged.
    pub fn coerce(&self, attribute: &Attribute) -> AttributeValue {
        match (self, attribute.kind()) {
            (AttributeValue::String(raw), AttributeKind::Integer) => raw
                .parse()
                .map(AttributeValue::Integer)
                .unwrap_or_else(|_| self.clone()),
            (AttributeValue::String(raw), AttributeKind::Boolean) => raw
                .parse()
                .map(AttributeValue::Boolean)
                .unwrap_or_else(|_| self.clone()),
            (AttributeValue::Integer(_) | AttributeValue::Boolean(_), AttributeKind::String) => {
                AttributeValue::String(self.to_string())
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Boolean(value) => write!(f, "{value}"),
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::String(value) => f.write_str(value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub attribute: Attribute,
    pub value: AttributeValue,
}

/// An immutable, insertion-ordered set of attribute values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<AttributeEntry>", from = "Vec<AttributeEntry>")]
pub struct ImmutableAttributes {
    entries: IndexMap<Attribute, AttributeValue>,
}

impl ImmutableAttributes {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shorthand for a set of string attributes.
    pub fn of(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .map(|(name, value)| (Attribute::of(name), AttributeValue::from(*value)))
            .collect()
    }

    /// A copy of this set with `attribute` set to `value`.
    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.entries.insert(attribute, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &AttributeValue)> {
        self.entries.iter()
    }

    pub fn find_entry(&self, attribute: &Attribute) -> Option<&AttributeValue> {
        self.entries.get(attribute)
    }

    /// Lookup ignoring the attribute type.
    pub fn find_entry_by_name(&self, name: &str) -> Option<(&Attribute, &AttributeValue)> {
        self.entries.iter().find(|(attribute, _)| attribute.name() == name)
    }

    /// Entries sorted by attribute name.
    pub fn sorted(&self) -> Vec<(&Attribute, &AttributeValue)> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));
        sorted
    }
}

impl FromIterator<(Attribute, AttributeValue)> for ImmutableAttributes {
    fn from_iter<T: IntoIterator<Item = (Attribute, AttributeValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<ImmutableAttributes> for Vec<AttributeEntry> {
    fn from(attributes: ImmutableAttributes) -> Self {
        attributes
            .entries
            .into_iter()
            .map(|(attribute, value)| AttributeEntry { attribute, value })
            .collect()
    }
}

impl From<Vec<AttributeEntry>> for ImmutableAttributes {
    fn from(entries: Vec<AttributeEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.attribute, entry.value))
            .collect()
    }
}

impl fmt::Display for ImmutableAttributes {
    /// `{name=value, ...}` sorted by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (attribute, value)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{attribute}={value}")?;
        }
        f.write_str("}")
    }
}
