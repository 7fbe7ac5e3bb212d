//! Items, conditions, and transaction operations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A stored item: flat map of attribute name to string value
pub type Item = BTreeMap<String, String>;

/// Build an item from attribute pairs
pub fn item<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Item
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Declaration of a single-partition-key table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub key_attribute: String,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, key_attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_attribute: key_attribute.into(),
        }
    }
}

/// Predicate over the current state of one item, evaluated atomically with
/// the write it guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Holds when the item is absent or lacks the attribute
    AttributeNotExists(String),
    /// Holds when the item exists and the attribute equals the value.
    /// A missing item never satisfies this, even against `""`.
    Equals(String, String),
    And(Vec<Condition>),
}

impl Condition {
    pub fn attribute_not_exists(attribute: impl Into<String>) -> Self {
        Condition::AttributeNotExists(attribute.into())
    }

    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Equals(attribute.into(), value.into())
    }

    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut all) => {
                all.push(other);
                Condition::And(all)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    pub fn evaluate(&self, current: Option<&Item>) -> bool {
        match self {
            Condition::AttributeNotExists(attribute) => {
                current.is_none_or(|item| !item.contains_key(attribute))
            }
            Condition::Equals(attribute, expected) => current
                .and_then(|item| item.get(attribute))
                .is_some_and(|actual| actual == expected),
            Condition::And(all) => all.iter().all(|c| c.evaluate(current)),
        }
    }
}

/// Key of one item to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOp {
    pub table: String,
    pub key: String,
}

impl GetOp {
    pub fn new(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
        }
    }
}

/// One write inside a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Replace the whole item. The item must carry the table's key attribute.
    Put {
        table: String,
        item: Item,
        condition: Option<Condition>,
    },
    /// Set attributes on the item, creating it if absent
    Update {
        table: String,
        key: String,
        set: Vec<(String, String)>,
        condition: Option<Condition>,
    },
    Delete {
        table: String,
        key: String,
        condition: Option<Condition>,
    },
}

impl WriteOp {
    pub fn table(&self) -> &str {
        match self {
            WriteOp::Put { table, .. }
            | WriteOp::Update { table, .. }
            | WriteOp::Delete { table, .. } => table,
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        match self {
            WriteOp::Put { condition, .. }
            | WriteOp::Update { condition, .. }
            | WriteOp::Delete { condition, .. } => condition.as_ref(),
        }
    }
}
