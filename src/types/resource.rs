//! The resource model the engine operates on.
//!
//! Resources are owned and mutated by the backing [`ValueStore`]; the engine
//! only ever works with snapshots of their ids and values.
//!
//! [`ValueStore`]: crate::traits::store::ValueStore

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a property, the attribute type a resource carries values for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for PropertyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The kinds of resources a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Item,
    ItemSet,
    Media,
}

impl ResourceKind {
    /// Every kind, in a fixed order. Merge rewriting walks all of them
    /// because references can cross kinds.
    pub const ALL: [ResourceKind; 3] = [Self::Item, Self::ItemSet, Self::Media];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::ItemSet => "item_set",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a single value.
///
/// Only literals participate in duplicate grouping; only references are
/// rewritten when their target is merged away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueData {
    /// A string payload.
    Literal(String),
    /// A pointer at another resource.
    Reference(ResourceId),
}

/// One value attached to a resource under one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub property: PropertyId,
    pub data: ValueData,
}

impl Value {
    /// A literal (string) value.
    pub fn literal(property: PropertyId, text: impl Into<String>) -> Self {
        Self {
            property,
            data: ValueData::Literal(text.into()),
        }
    }

    /// A reference value pointing at another resource.
    pub fn reference(property: PropertyId, target: ResourceId) -> Self {
        Self {
            property,
            data: ValueData::Reference(target),
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match &self.data {
            ValueData::Literal(text) => Some(text),
            ValueData::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<ResourceId> {
        match self.data {
            ValueData::Reference(target) => Some(target),
            ValueData::Literal(_) => None,
        }
    }
}

/// A stored record: an id, a kind, and the values it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub values: Vec<Value>,
}

impl Resource {
    pub fn new(id: impl Into<ResourceId>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            values: Vec::new(),
        }
    }

    /// Builder-style value attachment, for fixtures and seeding.
    pub fn with_value(mut self, value: Value) -> Self {
        self.values.push(value);
        self
    }

    /// All reference targets this resource points at.
    pub fn references(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.values.iter().filter_map(Value::as_reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_accessors_distinguish_payloads() {
        let literal = Value::literal(PropertyId(1), "Dubliners");
        assert_eq!(literal.as_literal(), Some("Dubliners"));
        assert_eq!(literal.as_reference(), None);

        let reference = Value::reference(PropertyId(1), ResourceId(7));
        assert_eq!(reference.as_literal(), None);
        assert_eq!(reference.as_reference(), Some(ResourceId(7)));
    }

    #[test]
    fn resource_lists_its_references() {
        let resource = Resource::new(1u64, ResourceKind::Item)
            .with_value(Value::literal(PropertyId(1), "title"))
            .with_value(Value::reference(PropertyId(2), ResourceId(5)))
            .with_value(Value::reference(PropertyId(2), ResourceId(9)));

        let targets: Vec<_> = resource.references().collect();
        assert_eq!(targets, vec![ResourceId(5), ResourceId(9)]);
    }

    #[test]
    fn kind_round_trips_through_serde() {
        let json = serde_json::to_string(&ResourceKind::ItemSet).unwrap();
        assert_eq!(json, "\"item_set\"");
        let back: ResourceKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ResourceKind::ItemSet);
    }
}
