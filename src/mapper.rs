// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Opens an image read-only, validates its header, and hands back the raw
//! mapped bytes plus the payload base and root offset a [`crate::reader::Reader`]
//! needs to start navigating.
//!
//! Grounded on the teacher's `btree::tree::BPlusTree::open`, which also
//! mmaps a file and refuses to trust it before checking a magic/version
//! header.

use crate::error::{SnapError, SnapResult};
use crate::format::{HEADER_LEN, MAGIC, VERSION};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// A validated, read-only mapping of a compiled image.
///
/// Shared behind an `Arc` so every sub-`Reader` produced from it can carry
/// a cheap handle without cloning the mapping itself — this is the
/// mechanism backing the "sub-Readers do not clone the mapping" rule.
pub struct Mapping {
    mmap: Mmap,
    root_offset: u32,
    payload_len: u32,
}

impl Mapping {
    /// Maps `path`, validates its header, and returns a ready-to-use
    /// mapping, or `CorruptImage` if the header is inconsistent with the
    /// file's actual length.
    pub fn open(path: &Path) -> SnapResult<Arc<Mapping>> {
        let file = File::open(path).map_err(|e| SnapError::IoError {
            operation: format!("open {}", path.display()),
            reason: e.to_string(),
        })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| SnapError::IoError {
            operation: format!("mmap {}", path.display()),
            reason: e.to_string(),
        })?;

        if mmap.len() < HEADER_LEN {
            return Err(corrupt(path, "file shorter than header"));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&mmap[0..4]);
        if magic != MAGIC {
            return Err(corrupt(path, "magic bytes mismatch"));
        }
        let version = u16::from_le_bytes(mmap[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(corrupt(path, &format!("unsupported format version {}", version)));
        }
        let root_offset = u32::from_le_bytes(mmap[24..28].try_into().unwrap());
        let payload_len = u32::from_le_bytes(mmap[28..32].try_into().unwrap());

        let expected_total = HEADER_LEN as u64 + payload_len as u64;
        if (mmap.len() as u64) < expected_total {
            return Err(corrupt(
                path,
                &format!(
                    "header declares payload_len {} but file is only {} bytes",
                    payload_len,
                    mmap.len()
                ),
            ));
        }
        if root_offset >= payload_len && payload_len > 0 {
            return Err(corrupt(path, "root offset lies outside payload"));
        }

        Ok(Arc::new(Mapping {
            mmap,
            root_offset,
            payload_len,
        }))
    }

    /// The payload region only, excluding the header.
    pub fn payload(&self) -> &[u8] {
        &self.mmap[HEADER_LEN..HEADER_LEN + self.payload_len as usize]
    }

    pub fn root_offset(&self) -> u32 {
        self.root_offset
    }
}

fn corrupt(path: &Path, reason: &str) -> SnapError {
    SnapError::CorruptImage {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
