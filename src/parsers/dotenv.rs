// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Hand-rolled dotenv line parser: the grammar is small enough that
//! reaching for an external dotenv crate would buy nothing over a direct
//! line scan, the same call the teacher makes for its own small text
//! formats rather than pulling in a parser crate for each one.

use super::scalar::{coerce_scalar, strip_quotes};
use crate::error::SnapResult;
use crate::value::Node;

/// Parses dotenv text into a flat `Object`. Blank lines and `#`-prefixed
/// comment lines are skipped; a line missing `=` is skipped rather than
/// treated as an error, matching shell `.env` tooling's tolerance of
/// stray lines.
pub fn parse(text: &str) -> SnapResult<Node> {
    let mut entries = Vec::new();
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            continue;
        }
        let value = strip_inline_comment(value.trim());
        entries.push((key, coerce_scalar(strip_quotes(value))));
    }
    Ok(Node::object(entries))
}

/// Strips a trailing `# ...` comment, unless it falls inside a quoted
/// value.
fn strip_inline_comment(value: &str) -> &str {
    if value.starts_with('"') || value.starts_with('\'') {
        return value;
    }
    match value.find('#') {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    }
}
