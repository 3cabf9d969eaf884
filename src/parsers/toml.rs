// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! TOML source parsing, via the `toml` crate.

use crate::error::{SnapError, SnapResult};
use crate::value::Node;

pub fn parse(text: &str) -> SnapResult<Node> {
    let value: toml::Value = text.parse().map_err(|e: toml::de::Error| SnapError::ParseError {
        format: "toml".to_string(),
        reason: e.to_string(),
        position: e.span().map(|s| s.start),
    })?;
    Ok(from_toml(value))
}

fn from_toml(value: toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::String(s),
        toml::Value::Integer(i) => Node::Int(i),
        toml::Value::Float(f) => Node::Float(f),
        toml::Value::Boolean(b) => Node::Bool(b),
        // TOML has no native null; a datetime is the closest thing to an
        // opaque scalar the format defines beyond the four value types
        // above, so it's carried through as its canonical string form.
        toml::Value::Datetime(dt) => Node::String(dt.to_string()),
        toml::Value::Array(items) => Node::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => {
            Node::object(table.into_iter().map(|(k, v)| (k, from_toml(v))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tables_and_arrays() {
        let node = parse(
            r#"
            [package]
            authors = ["Alice", "Bob"]

            [features]
            list = ["a", "b", "c"]
            "#,
        )
        .unwrap();
        match node {
            Node::Object(entries) => assert_eq!(entries.len(), 2),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn distinguishes_int_from_float() {
        assert_eq!(parse("x = 5").unwrap(), Node::object(vec![("x".into(), Node::Int(5))]));
        assert_eq!(parse("x = 5.5").unwrap(), Node::object(vec![("x".into(), Node::Float(5.5))]));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(parse("not = valid = toml").is_err());
    }
}
