// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! JSON source parsing, via `serde_json`.

use crate::error::{SnapError, SnapResult};
use crate::value::Node;

pub fn parse(text: &str) -> SnapResult<Node> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| SnapError::ParseError {
        format: "json".to_string(),
        reason: e.to_string(),
        position: Some(e.line() * 1000 + e.column()),
    })?;
    Ok(from_json(value))
}

fn from_json(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Null => Node::Null,
        serde_json::Value::Bool(b) => Node::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Int(i)
            } else {
                Node::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Node::String(s),
        serde_json::Value::Array(items) => Node::Array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => {
            Node::object(map.into_iter().map(|(k, v)| (k, from_json(v))))
        }
    }
}
