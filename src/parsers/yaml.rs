// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! YAML source parsing, via `serde_yaml`'s safe subset: no custom tags,
//! no alias execution, just the scalar/sequence/mapping value model.

use crate::error::{SnapError, SnapResult};
use crate::value::Node;

pub fn parse(text: &str) -> SnapResult<Node> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| SnapError::ParseError {
        format: "yaml".to_string(),
        reason: e.to_string(),
        position: e.location().map(|l| l.index()),
    })?;
    from_yaml(value)
}

fn from_yaml(value: serde_yaml::Value) -> SnapResult<Node> {
    Ok(match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Int(i)
            } else {
                Node::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_yaml::Value::String(s) => Node::String(s),
        serde_yaml::Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_yaml(item)?);
            }
            Node::Array(out)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (k, v) in map {
                let key = k.as_str().map(str::to_string).ok_or_else(|| SnapError::EncodingError {
                    reason: "YAML mapping keys must be strings".to_string(),
                })?;
                entries.push((key, from_yaml(v)?));
            }
            Node::object(entries)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}
