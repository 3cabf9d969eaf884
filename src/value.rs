// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The abstract tree: the dynamically-typed value model shared by every
//! text parser, the Writer, and `Reader::to_native`.
//!
//! A [`Node`] is what parsers build and the Writer consumes. A [`Value`] is
//! what `Reader::to_native` produces: an owned copy for callers who need a
//! value that outlives the mapping. They carry identical variants; `Node`
//! additionally guarantees `Object` keys are sorted and unique once a tree
//! is about to be handed to the Writer.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One node of the abstract configuration tree.
///
/// Exactly one of seven variants, matching the compiled image's tag byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Node>),
    /// Sorted by key byte order. Use [`Node::object`] to build one from an
    /// arbitrary key order — it sorts and dedupes (last write wins).
    Object(Vec<(String, Node)>),
}

impl Node {
    /// Builds an `Object` node from entries in any order, sorting by key
    /// byte order and resolving duplicate keys last-write-wins.
    pub fn object(entries: impl IntoIterator<Item = (String, Node)>) -> Node {
        let mut map: BTreeMap<Vec<u8>, (String, Node)> = BTreeMap::new();
        for (key, value) in entries {
            map.insert(key.clone().into_bytes(), (key, value));
        }
        Node::Object(map.into_values().collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }
}

/// Owned, host-visible materialization of a subtree.
///
/// Produced by `Reader::to_native()`. Unlike [`Node`], an `Object`'s
/// entries are exposed as a `Vec` in stored (sorted) order rather than a
/// hash map, so round-tripping through `to_native` preserves the order
/// lookups observe.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

// Hand-written rather than `#[derive(Serialize)] #[serde(untagged)]`:
// an untagged enum serializes `Object`'s `Vec<(String, Value)>` as a
// JSON array of two-element arrays, not as a JSON object. This impl
// serializes Object as a real map, preserving entry order.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Int(i) => Value::Int(*i),
            Node::Float(f) => Value::Float(*f),
            Node::String(s) => Value::String(s.clone()),
            Node::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_sorts_and_dedupes() {
        let node = Node::object(vec![
            ("b".to_string(), Node::Int(1)),
            ("a".to_string(), Node::Int(2)),
            ("a".to_string(), Node::Int(3)), // last write wins
        ]);
        match node {
            Node::Object(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0, "a");
                assert_eq!(entries[0].1, Node::Int(3));
                assert_eq!(entries[1].0, "b");
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn value_from_node_preserves_order() {
        let node = Node::object(vec![
            ("z".to_string(), Node::Bool(true)),
            ("a".to_string(), Node::Null),
        ]);
        let value = Value::from(&node);
        match value {
            Value::Object(entries) => {
                assert_eq!(entries[0].0, "a");
                assert_eq!(entries[1].0, "z");
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn object_serializes_as_a_json_object_not_an_array_of_pairs() {
        let value = Value::Object(vec![
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::String("two".to_string())),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"a":1,"b":"two"}"#);
    }

    #[test]
    fn null_serializes_to_json_null() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    }
}
