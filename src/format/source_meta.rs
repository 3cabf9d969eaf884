// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Source file metadata as recorded in (and compared against) an image
//! header: size in bytes and modification time at nanosecond precision.

use crate::error::{SnapError, SnapResult};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Size and mtime of a source file at the moment it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMeta {
    pub size: u64,
    pub mtime_ns: u64,
}

impl SourceMeta {
    /// Stats `path` and extracts the fields an image header records.
    pub fn observe(path: &Path) -> SnapResult<SourceMeta> {
        let metadata = fs::metadata(path).map_err(|e| SnapError::IoError {
            operation: format!("stat {}", path.display()),
            reason: e.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(SnapError::IoError {
                operation: format!("stat {}", path.display()),
                reason: "not a regular file".to_string(),
            });
        }
        let modified = metadata.modified().map_err(|e| SnapError::IoError {
            operation: format!("stat mtime {}", path.display()),
            reason: e.to_string(),
        })?;
        let mtime_ns = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Ok(SourceMeta {
            size: metadata.len(),
            mtime_ns,
        })
    }
}
