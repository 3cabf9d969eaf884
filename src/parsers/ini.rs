// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! INI source parsing, via the `ini` crate. Sections become a top-level
//! Object of Objects; keys outside any section land in a `"general"`
//! section, matching the `ini` crate's own notion of a nameless section.

use super::scalar::{coerce_scalar, strip_quotes};
use crate::error::{SnapError, SnapResult};
use crate::value::Node;

pub fn parse(text: &str) -> SnapResult<Node> {
    let conf = ini::Ini::load_from_str(text).map_err(|e| SnapError::ParseError {
        format: "ini".to_string(),
        reason: e.to_string(),
        position: None,
    })?;

    let mut sections = Vec::new();
    for (name, props) in conf.iter() {
        let section_name = name.unwrap_or("general").to_string();
        let entries: Vec<(String, Node)> = props
            .iter()
            .map(|(k, v)| (k.to_string(), coerce_scalar(strip_quotes(v))))
            .collect();
        sections.push((section_name, Node::object(entries)));
    }
    Ok(Node::object(sections))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_become_nested_objects() {
        let node = parse("[database]\nhost = localhost\nport = 5432\n").unwrap();
        match node {
            Node::Object(sections) => {
                let (name, section) = &sections[0];
                assert_eq!(name, "database");
                match section {
                    Node::Object(entries) => {
                        assert_eq!(entries[0], ("host".to_string(), Node::String("localhost".to_string())));
                        assert_eq!(entries[1], ("port".to_string(), Node::Int(5432)));
                    }
                    _ => panic!("expected object"),
                }
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn coerces_null_and_bool_variants() {
        let node = parse("[section]\nempty =\nnil = nil\nTRUE = TRUE\nFalse = False\n").unwrap();
        match node {
            Node::Object(sections) => {
                let (_, entries) = &sections[0];
                match entries {
                    Node::Object(entries) => {
                        let map: std::collections::HashMap<_, _> = entries.iter().cloned().collect();
                        assert_eq!(map["empty"], Node::String(String::new()));
                        assert_eq!(map["nil"], Node::Null);
                        assert_eq!(map["TRUE"], Node::Bool(true));
                        assert_eq!(map["False"], Node::Bool(false));
                    }
                    _ => panic!("expected object"),
                }
            }
            _ => panic!("expected object"),
        }
    }
}
