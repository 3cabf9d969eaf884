// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Navigates a mapped image to satisfy typed lookups, dotted-path
//! traversal, iteration, and sub-view extraction — all without allocating
//! or copying, beyond what's needed to materialize an owned `String`/`Value`
//! for the caller.
//!
//! A [`Reader`] is a lightweight value: an `Arc<Mapping>` plus a current
//! node offset. Sub-readers (`index`, `key`) are produced by cloning that
//! `Arc` and changing the offset — the mapping itself is never copied,
//! which is how the lifetime-coupling rule in the spec's design notes is
//! satisfied without borrow-parametrizing every `Reader`.

mod keys;
mod path;

pub use keys::Keys;

use crate::error::{SnapError, SnapResult};
use crate::format::{decode_node_header, NodeHeader};
use crate::mapper::Mapping;
use crate::value::Value;
use std::sync::Arc;

/// A handle onto one node of a mapped image.
#[derive(Clone)]
pub struct Reader {
    mapping: Arc<Mapping>,
    offset: u32,
}

impl Reader {
    /// Builds a `Reader` rooted at the image's root node.
    pub(crate) fn at_root(mapping: Arc<Mapping>) -> Reader {
        let offset = mapping.root_offset();
        Reader { mapping, offset }
    }

    fn header(&self) -> SnapResult<NodeHeader> {
        decode_node_header(self.mapping.payload(), self.offset).map_err(|e| match e {
            SnapError::CorruptImage { reason, .. } => SnapError::CorruptImage {
                path: "<mapped image>".to_string(),
                reason,
            },
            other => other,
        })
    }

    fn at(&self, offset: u32) -> Reader {
        Reader {
            mapping: Arc::clone(&self.mapping),
            offset,
        }
    }

    /// Symbolic name of this node's tag: `"null"`, `"bool"`, `"int"`,
    /// `"float"`, `"string"`, `"array"`, or `"object"`.
    pub fn root_type(&self) -> SnapResult<&'static str> {
        Ok(match self.header()? {
            NodeHeader::Null => "null",
            NodeHeader::Bool(_) => "bool",
            NodeHeader::Int(_) => "int",
            NodeHeader::Float(_) => "float",
            NodeHeader::String { .. } => "string",
            NodeHeader::Array { .. } => "array",
            NodeHeader::Object { .. } => "object",
        })
    }

    /// Element count for Array/Object, byte length for String. An error
    /// for scalars (Null/Bool/Int/Float have no length).
    pub fn len(&self) -> SnapResult<usize> {
        match self.header()? {
            NodeHeader::String { len, .. } => Ok(len as usize),
            NodeHeader::Array { count, .. } => Ok(count as usize),
            NodeHeader::Object { count, .. } => Ok(count as usize),
            other => Err(type_mismatch("array, object, or string", &other)),
        }
    }

    pub fn is_empty(&self) -> SnapResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Bounds-checked element access on an Array.
    pub fn index(&self, i: usize) -> SnapResult<Reader> {
        match self.header()? {
            NodeHeader::Array { table_offset, count } => {
                if i >= count as usize {
                    return Err(SnapError::IndexOutOfRange {
                        index: i,
                        len: count as usize,
                    });
                }
                let entry = table_offset as usize + i * 4;
                let child_offset =
                    u32::from_le_bytes(self.mapping.payload()[entry..entry + 4].try_into().unwrap());
                Ok(self.at(child_offset))
            }
            other => Err(type_mismatch("array", &other)),
        }
    }

    /// Binary-searches an Object's key-offset table by byte order.
    pub fn key(&self, k: &str) -> SnapResult<Reader> {
        self.try_key(k)?.ok_or_else(|| SnapError::KeyMissing { key: k.to_string() })
    }

    /// As [`Reader::key`], but returns `Ok(None)` instead of
    /// `KeyMissing` when absent.
    pub fn try_key(&self, k: &str) -> SnapResult<Option<Reader>> {
        match self.header()? {
            NodeHeader::Object { table_offset, count } => {
                match self.binary_search_key(table_offset, count, k.as_bytes())? {
                    Some(value_offset) => Ok(Some(self.at(value_offset))),
                    None => Ok(None),
                }
            }
            other => Err(type_mismatch("object", &other)),
        }
    }

    /// Same search as [`Reader::key`] without materializing a sub-reader.
    pub fn contains(&self, k: &str) -> SnapResult<bool> {
        match self.header()? {
            NodeHeader::Object { table_offset, count } => {
                Ok(self.binary_search_key(table_offset, count, k.as_bytes())?.is_some())
            }
            other => Err(type_mismatch("object", &other)),
        }
    }

    /// Binary search over the sorted key-offset table, returning the
    /// matching entry's value offset.
    fn binary_search_key(&self, table_offset: u32, count: u32, needle: &[u8]) -> SnapResult<Option<u32>> {
        let payload = self.mapping.payload();
        let mut lo = 0usize;
        let mut hi = count as usize;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = table_offset as usize + mid * 8;
            let key_offset =
                u32::from_le_bytes(payload[entry..entry + 4].try_into().unwrap());
            let key_bytes = self.key_bytes_at(key_offset)?;
            match key_bytes.cmp(needle) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => {
                    let value_offset = u32::from_le_bytes(
                        payload[entry + 4..entry + 8].try_into().unwrap(),
                    );
                    return Ok(Some(value_offset));
                }
            }
        }
        Ok(None)
    }

    fn key_bytes_at(&self, offset: u32) -> SnapResult<&[u8]> {
        match decode_node_header(self.mapping.payload(), offset)? {
            NodeHeader::String { data_offset, len } => {
                Ok(&self.mapping.payload()[data_offset as usize..data_offset as usize + len as usize])
            }
            other => Err(type_mismatch("string (object key)", &other)),
        }
    }

    /// Lazy iterator over an Object's keys, in stored (sorted) order.
    pub fn keys(&self) -> SnapResult<Keys<'_>> {
        match self.header()? {
            NodeHeader::Object { table_offset, count } => Ok(Keys::new(self, table_offset, count)),
            other => Err(type_mismatch("object", &other)),
        }
    }

    /// Dotted-path traversal: see [`path::traverse`] for the segment
    /// rules.
    pub fn get(&self, dotted_path: &str) -> SnapResult<Reader> {
        path::traverse(self, dotted_path)
    }

    /// As [`Reader::get`], but returns `Ok(None)` for `KeyMissing` and
    /// `IndexOutOfRange` instead of propagating them, so a caller probing
    /// for optional configuration doesn't need to match error kinds.
    pub fn get_opt(&self, dotted_path: &str) -> SnapResult<Option<Reader>> {
        match self.get(dotted_path) {
            Ok(reader) => Ok(Some(reader)),
            Err(SnapError::KeyMissing { .. }) | Err(SnapError::IndexOutOfRange { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    pub fn as_null(&self) -> SnapResult<()> {
        match self.header()? {
            NodeHeader::Null => Ok(()),
            other => Err(type_mismatch("null", &other)),
        }
    }

    pub fn as_bool(&self) -> SnapResult<bool> {
        match self.header()? {
            NodeHeader::Bool(b) => Ok(b),
            other => Err(type_mismatch("bool", &other)),
        }
    }

    pub fn as_int(&self) -> SnapResult<i64> {
        match self.header()? {
            NodeHeader::Int(i) => Ok(i),
            other => Err(type_mismatch("int", &other)),
        }
    }

    pub fn as_float(&self) -> SnapResult<f64> {
        match self.header()? {
            NodeHeader::Float(f) => Ok(f),
            other => Err(type_mismatch("float", &other)),
        }
    }

    pub fn as_str(&self) -> SnapResult<&str> {
        match self.header()? {
            NodeHeader::String { data_offset, len } => {
                let bytes = &self.mapping.payload()[data_offset as usize..data_offset as usize + len as usize];
                std::str::from_utf8(bytes).map_err(|e| SnapError::EncodingError {
                    reason: e.to_string(),
                })
            }
            other => Err(type_mismatch("string", &other)),
        }
    }

    /// Materializes this subtree into an owned [`Value`].
    pub fn to_native(&self) -> SnapResult<Value> {
        Ok(match self.header()? {
            NodeHeader::Null => Value::Null,
            NodeHeader::Bool(b) => Value::Bool(b),
            NodeHeader::Int(i) => Value::Int(i),
            NodeHeader::Float(f) => Value::Float(f),
            NodeHeader::String { .. } => Value::String(self.as_str()?.to_string()),
            NodeHeader::Array { count, .. } => {
                let mut items = Vec::with_capacity(count as usize);
                for i in 0..count as usize {
                    items.push(self.index(i)?.to_native()?);
                }
                Value::Array(items)
            }
            NodeHeader::Object { .. } => {
                let mut entries = Vec::new();
                for key in self.keys()? {
                    let key = key?;
                    let value = self.key(&key)?.to_native()?;
                    entries.push((key.to_string(), value));
                }
                Value::Object(entries)
            }
        })
    }
}

fn type_mismatch(expected: &str, found: &NodeHeader) -> SnapError {
    let found_name = match found {
        NodeHeader::Null => "null",
        NodeHeader::Bool(_) => "bool",
        NodeHeader::Int(_) => "int",
        NodeHeader::Float(_) => "float",
        NodeHeader::String { .. } => "string",
        NodeHeader::Array { .. } => "array",
        NodeHeader::Object { .. } => "object",
    };
    SnapError::TypeMismatch {
        expected: expected.to_string(),
        found: found_name.to_string(),
    }
}
