// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Dotted-path traversal: `a.b.2.c` descends through objects by key and
//! through arrays by non-negative integer index, failing fast the moment
//! a segment doesn't suit the current container — no try-key-then-try-index
//! fallback, just an explicit match on the node's tag.

use super::Reader;
use crate::error::{SnapError, SnapResult};

pub fn traverse(root: &Reader, dotted_path: &str) -> SnapResult<Reader> {
    let mut current = root.clone();
    for segment in dotted_path.split('.') {
        current = step(&current, segment)?;
    }
    Ok(current)
}

fn step(current: &Reader, segment: &str) -> SnapResult<Reader> {
    let kind = current.root_type()?;
    match kind {
        "object" => current.key(segment),
        "array" => match segment.parse::<usize>() {
            Ok(index) => current.index(index),
            Err(_) => Err(SnapError::PathTypeMismatch {
                segment: segment.to_string(),
                node_kind: kind.to_string(),
            }),
        },
        other => Err(SnapError::PathTypeMismatch {
            segment: segment.to_string(),
            node_kind: other.to_string(),
        }),
    }
}
