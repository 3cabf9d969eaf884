// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Serializes an abstract tree into a compiled image, written atomically
//! beside the source it was parsed from.
//!
//! ## Layout decision: object keys are encoded as String nodes
//!
//! The format spec leaves the exact byte shape of an object's key strings
//! unstated beyond "concatenated key strings". This writer encodes each
//! key with the identical tag-prefixed, length-prefixed shape used for a
//! `String` node, so a key offset in an object's offset table is a valid
//! node offset — the Reader decodes keys with the same
//! [`crate::format::decode_node_header`] it uses for everything else,
//! rather than a second ad-hoc string format.
//!
//! ## Algorithm
//!
//! Emission is a single depth-first pass into a growable buffer. Every
//! node pads the buffer to a 4-byte boundary before it starts (so its
//! offset is always a multiple of [`format::ALIGN`]), writes its tag and
//! any fixed fields, and — for containers — reserves a zeroed offset table
//! before recursing into children and patching the table with each
//! child's start offset. Because children are always emitted immediately
//! after their parent's table, this produces exactly the "offset table
//! then concatenated children" layout the format specifies, without a
//! separate sizing pass: each recursive call already knows its own start
//! offset (`buf.len()` on entry) and fills in the table as children return
//! theirs.

use crate::error::{SnapError, SnapResult};
use crate::format::{self, SourceMeta, ALIGN, HEADER_LEN, MAGIC, MAX_CONTAINER_LEN, MAX_PAYLOAD_LEN, VERSION};
use crate::value::Node;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

/// Writes `tree`, observed from `source`, into `destination` as a
/// complete, valid image. The file is created atomically: readers either
/// see the previous `destination` or this one, never a partial write.
pub fn write_image(tree: &Node, source: &Path, destination: &Path) -> SnapResult<PathBuf> {
    let source_meta = SourceMeta::observe(source)?;
    write_image_with_meta(tree, source_meta, destination)
}

/// As [`write_image`], but with source metadata supplied directly — used
/// when the caller already stat'd the source (the common Loader path) or
/// wants to stamp an image with metadata from elsewhere entirely.
pub fn write_image_with_meta(
    tree: &Node,
    source_meta: SourceMeta,
    destination: &Path,
) -> SnapResult<PathBuf> {
    let mut payload = Vec::new();
    let root_offset = emit_node(&mut payload, tree)?;

    if payload.len() as u64 > MAX_PAYLOAD_LEN {
        return Err(SnapError::CapacityExceeded {
            reason: format!(
                "payload length {} exceeds version {} limit of {} bytes",
                payload.len(),
                VERSION,
                MAX_PAYLOAD_LEN
            ),
        });
    }

    let mut image = Vec::with_capacity(HEADER_LEN + payload.len());
    image.extend_from_slice(&MAGIC);
    image.extend_from_slice(&VERSION.to_le_bytes());
    image.extend_from_slice(&0u16.to_le_bytes()); // flags, reserved
    image.extend_from_slice(&source_meta.size.to_le_bytes());
    image.extend_from_slice(&source_meta.mtime_ns.to_le_bytes());
    image.extend_from_slice(&root_offset.to_le_bytes());
    image.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    debug_assert_eq!(image.len(), HEADER_LEN);
    image.extend_from_slice(&payload);

    write_atomic(destination, &image)?;
    log::info!(
        "compiled {} -> {} ({} bytes payload)",
        destination.with_extension("").display(),
        destination.display(),
        payload.len()
    );
    Ok(destination.to_path_buf())
}

/// Pads `buf` to the next 4-byte boundary.
fn pad_to_align(buf: &mut Vec<u8>) {
    let target = format::align_up(buf.len());
    buf.resize(target, 0);
}

/// Emits `node` (and, for containers, its entire subtree) into `buf`,
/// returning the payload-relative offset it was written at.
fn emit_node(buf: &mut Vec<u8>, node: &Node) -> SnapResult<u32> {
    match node {
        Node::Null => {
            pad_to_align(buf);
            let start = buf.len() as u32;
            buf.push(0); // Tag::Null
            Ok(start)
        }
        Node::Bool(value) => {
            pad_to_align(buf);
            let start = buf.len() as u32;
            buf.push(1); // Tag::Bool
            buf.push(*value as u8);
            Ok(start)
        }
        Node::Int(value) => {
            pad_to_align(buf);
            let start = buf.len() as u32;
            buf.push(2); // Tag::Int
            buf.extend_from_slice(&value.to_le_bytes());
            Ok(start)
        }
        Node::Float(value) => {
            pad_to_align(buf);
            let start = buf.len() as u32;
            buf.push(3); // Tag::Float
            buf.extend_from_slice(&value.to_bits().to_le_bytes());
            Ok(start)
        }
        Node::String(value) => emit_string(buf, value),
        Node::Array(items) => {
            if items.len() as u64 > MAX_CONTAINER_LEN {
                return Err(SnapError::CapacityExceeded {
                    reason: format!("array has {} elements, limit is {}", items.len(), MAX_CONTAINER_LEN),
                });
            }
            pad_to_align(buf);
            let start = buf.len() as u32;
            buf.push(5); // Tag::Array
            buf.extend_from_slice(&(items.len() as u32).to_le_bytes());
            let table_pos = buf.len();
            buf.resize(table_pos + items.len() * 4, 0);
            for (i, item) in items.iter().enumerate() {
                let child_offset = emit_node(buf, item)?;
                buf[table_pos + i * 4..table_pos + i * 4 + 4]
                    .copy_from_slice(&child_offset.to_le_bytes());
            }
            Ok(start)
        }
        Node::Object(entries) => {
            // The writer re-sorts and dedupes defensively: invariant 2
            // must hold regardless of how the caller built this `Node`.
            let sorted = sort_and_dedupe(entries);
            if sorted.len() as u64 > MAX_CONTAINER_LEN {
                return Err(SnapError::CapacityExceeded {
                    reason: format!("object has {} entries, limit is {}", sorted.len(), MAX_CONTAINER_LEN),
                });
            }
            pad_to_align(buf);
            let start = buf.len() as u32;
            buf.push(6); // Tag::Object
            buf.extend_from_slice(&(sorted.len() as u32).to_le_bytes());
            let table_pos = buf.len();
            buf.resize(table_pos + sorted.len() * 8, 0);
            for (i, (key, value)) in sorted.iter().enumerate() {
                let key_offset = emit_string(buf, key)?;
                let value_offset = emit_node(buf, value)?;
                let entry_pos = table_pos + i * 8;
                buf[entry_pos..entry_pos + 4].copy_from_slice(&key_offset.to_le_bytes());
                buf[entry_pos + 4..entry_pos + 8].copy_from_slice(&value_offset.to_le_bytes());
            }
            Ok(start)
        }
    }
}

fn emit_string(buf: &mut Vec<u8>, value: &str) -> SnapResult<u32> {
    let bytes = value.as_bytes();
    if bytes.len() as u64 > MAX_PAYLOAD_LEN {
        return Err(SnapError::CapacityExceeded {
            reason: format!("string of {} bytes exceeds payload limit", bytes.len()),
        });
    }
    pad_to_align(buf);
    let start = buf.len() as u32;
    buf.push(4); // Tag::String
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
    Ok(start)
}

fn sort_and_dedupe(entries: &[(String, Node)]) -> Vec<(String, Node)> {
    let mut sorted: Vec<(String, Node)> = entries.to_vec();
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    sorted.dedup_by(|later, earlier| {
        // `dedup_by` compares adjacent pairs; since input is duplicate key
        // order-stable after the sort, later write order isn't recoverable
        // here, so ties keep the earlier (lexicographically first-seen)
        // slot content but retain the last occurrence's stability by
        // overwriting it — `sort_by` is stable, so for equal keys the
        // original relative order survives, and we want the *last*
        // original occurrence to win.
        if later.0 == earlier.0 {
            std::mem::swap(&mut earlier.1, &mut later.1);
            true
        } else {
            false
        }
    });
    sorted
}

/// Writes `bytes` to `path` via a uniquely-named temporary file plus
/// rename, so concurrent readers never observe a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> SnapResult<()> {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let temp_name = format!(
        "{}.tmp.{}.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("image"),
        process::id(),
        nonce
    );
    let temp_path = path.with_file_name(temp_name);

    let result = (|| -> SnapResult<()> {
        let mut file = File::create(&temp_path).map_err(|e| SnapError::IoError {
            operation: format!("create {}", temp_path.display()),
            reason: e.to_string(),
        })?;
        file.write_all(bytes).map_err(|e| SnapError::IoError {
            operation: format!("write {}", temp_path.display()),
            reason: e.to_string(),
        })?;
        file.sync_all().map_err(|e| SnapError::IoError {
            operation: format!("fsync {}", temp_path.display()),
            reason: e.to_string(),
        })?;
        rename_onto(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(not(windows))]
fn rename_onto(temp_path: &Path, path: &Path) -> SnapResult<()> {
    fs::rename(temp_path, path).map_err(|e| SnapError::IoError {
        operation: format!("rename {} -> {}", temp_path.display(), path.display()),
        reason: e.to_string(),
    })
}

/// On Windows, `rename` can fail when the target is open (e.g. mapped by
/// this same process). Retry once, then fall back to a non-atomic copy —
/// only after confirming the target isn't currently mapped by us, which
/// the caller guarantees by never holding a `Reader` open across a
/// recompile of the same path.
#[cfg(windows)]
fn rename_onto(temp_path: &Path, path: &Path) -> SnapResult<()> {
    if fs::rename(temp_path, path).is_ok() {
        return Ok(());
    }
    std::thread::sleep(std::time::Duration::from_millis(10));
    if fs::rename(temp_path, path).is_ok() {
        return Ok(());
    }
    let copy_result = fs::copy(temp_path, path)
        .map(|_| ())
        .map_err(|e| SnapError::IoError {
            operation: format!("copy {} -> {}", temp_path.display(), path.display()),
            reason: e.to_string(),
        });
    let _ = fs::remove_file(temp_path);
    copy_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::decode_node_header;

    #[test]
    fn emits_aligned_offsets() {
        let tree = Node::object(vec![
            ("a".to_string(), Node::Int(1)),
            ("b".to_string(), Node::String("hello".to_string())),
        ]);
        let mut buf = Vec::new();
        let root = emit_node(&mut buf, &tree).unwrap();
        assert_eq!(root % ALIGN as u32, 0);
        let header = decode_node_header(&buf, root).unwrap();
        match header {
            crate::format::NodeHeader::Object { count, .. } => assert_eq!(count, 2),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn object_keys_are_sorted_and_deduped() {
        let tree = Node::Object(vec![
            ("z".to_string(), Node::Int(1)),
            ("a".to_string(), Node::Int(2)),
            ("a".to_string(), Node::Int(3)),
        ]);
        let mut buf = Vec::new();
        let root = emit_node(&mut buf, &tree).unwrap();
        let header = decode_node_header(&buf, root).unwrap();
        let (table_offset, count) = match header {
            crate::format::NodeHeader::Object { table_offset, count } => (table_offset, count),
            other => panic!("expected object, got {:?}", other),
        };
        assert_eq!(count, 2);
        let first_key_offset = u32::from_le_bytes(
            buf[table_offset as usize..table_offset as usize + 4]
                .try_into()
                .unwrap(),
        );
        let key_header = decode_node_header(&buf, first_key_offset).unwrap();
        match key_header {
            crate::format::NodeHeader::String { data_offset, len } => {
                let bytes = &buf[data_offset as usize..data_offset as usize + len as usize];
                assert_eq!(bytes, b"a");
            }
            other => panic!("expected string key, got {:?}", other),
        }
    }

    #[test]
    fn array_elements_follow_their_offset_table() {
        let tree = Node::Array(vec![Node::Int(1), Node::Int(2), Node::Int(3)]);
        let mut buf = Vec::new();
        let root = emit_node(&mut buf, &tree).unwrap();
        let header = decode_node_header(&buf, root).unwrap();
        match header {
            crate::format::NodeHeader::Array { count, .. } => assert_eq!(count, 3),
            other => panic!("expected array, got {:?}", other),
        }
    }
}
