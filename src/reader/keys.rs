// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Lazy iteration over an Object's key-offset table.

use super::Reader;
use crate::error::SnapResult;
use crate::format::{decode_node_header, NodeHeader};

/// Iterator over an Object's keys, yielding them in stored (sorted) order
/// as borrowed string slices — no allocation per key.
pub struct Keys<'a> {
    reader: &'a Reader,
    table_offset: u32,
    count: u32,
    index: u32,
}

impl<'a> Keys<'a> {
    pub(super) fn new(reader: &'a Reader, table_offset: u32, count: u32) -> Keys<'a> {
        Keys {
            reader,
            table_offset,
            count,
            index: 0,
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = SnapResult<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let payload = self.reader.mapping.payload();
        let entry = self.table_offset as usize + self.index as usize * 8;
        let key_offset = u32::from_le_bytes(payload[entry..entry + 4].try_into().unwrap());
        self.index += 1;

        Some(
            decode_node_header(payload, key_offset).and_then(|header| match header {
                NodeHeader::String { data_offset, len } => {
                    let bytes = &payload[data_offset as usize..data_offset as usize + len as usize];
                    std::str::from_utf8(bytes).map_err(|e| crate::error::SnapError::EncodingError {
                        reason: e.to_string(),
                    })
                }
                other => Err(super::type_mismatch("string (object key)", &other)),
            }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Keys<'a> {}
