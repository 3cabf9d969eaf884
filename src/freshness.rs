// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Decides whether an existing image may be used as-is, without reading
//! its payload or touching the source beyond a single `stat`.
//!
//! Intentionally does not hash the source: startup cost must stay bounded
//! by header-sized I/O, and the size+mtime pair is sufficient under the
//! single-writer-per-filesystem assumption this crate targets. Any
//! mismatch, or any I/O error while inspecting either file, is treated as
//! "not fresh" — the Loader will just recompile.

use crate::format::{SourceMeta, HEADER_LEN, MAGIC, VERSION};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Why an image was judged stale, for diagnostics only — never surfaced
/// as an error, since staleness is routine control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    ImageMissing,
    SourceMissing,
    NotAFreshnessCandidate,
    SizeMismatch,
    MtimeMismatch,
    MagicMismatch,
    VersionMismatch,
    HeaderUnreadable,
}

/// `Ok(())` if `image_path` may be used as-is for `source_path`;
/// `Err(reason)` otherwise. Never returns a hard error — staleness and
/// I/O failure are both folded into "not fresh" per the spec.
pub fn check(source_path: &Path, image_path: &Path) -> Result<(), StaleReason> {
    match std::fs::metadata(source_path) {
        Ok(m) if m.is_file() => {}
        Ok(_) => return Err(StaleReason::NotAFreshnessCandidate),
        Err(_) => return Err(StaleReason::SourceMissing),
    };
    match std::fs::metadata(image_path) {
        Ok(m) if m.is_file() => {}
        Ok(_) => return Err(StaleReason::NotAFreshnessCandidate),
        Err(_) => return Err(StaleReason::ImageMissing),
    };

    let observed = SourceMeta::observe(source_path).map_err(|_| StaleReason::SourceMissing)?;
    let header = read_header_fields(image_path).ok_or(StaleReason::HeaderUnreadable)?;

    if header.magic != MAGIC {
        return Err(StaleReason::MagicMismatch);
    }
    if header.version != VERSION {
        return Err(StaleReason::VersionMismatch);
    }
    if header.source_size != observed.size {
        return Err(StaleReason::SizeMismatch);
    }
    if header.source_mtime_ns != observed.mtime_ns {
        return Err(StaleReason::MtimeMismatch);
    }
    Ok(())
}

/// True if `check` succeeds; logs the verdict at `trace`/`debug` level.
pub fn is_fresh(source_path: &Path, image_path: &Path) -> bool {
    match check(source_path, image_path) {
        Ok(()) => {
            log::trace!("{} is fresh relative to {}", image_path.display(), source_path.display());
            true
        }
        Err(reason) => {
            log::debug!(
                "{} is stale relative to {}: {:?}",
                image_path.display(),
                source_path.display(),
                reason
            );
            false
        }
    }
}

struct HeaderFields {
    magic: [u8; 4],
    version: u16,
    source_size: u64,
    source_mtime_ns: u64,
}

/// Reads just the header-sized prefix of `image_path` and decodes the
/// fields freshness cares about. Returns `None` on any I/O error or a
/// file shorter than the header — both fold into "not fresh".
fn read_header_fields(image_path: &Path) -> Option<HeaderFields> {
    let mut file = File::open(image_path).ok()?;
    let mut buf = [0u8; HEADER_LEN];
    file.read_exact(&mut buf).ok()?;

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);
    let version = u16::from_le_bytes(buf[4..6].try_into().unwrap());
    let source_size = u64::from_le_bytes(buf[8..16].try_into().unwrap());
    let source_mtime_ns = u64::from_le_bytes(buf[16..24].try_into().unwrap());

    Some(HeaderFields {
        magic,
        version,
        source_size,
        source_mtime_ns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Node;
    use crate::writer::write_image;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fresh_after_compile_and_stale_after_edit() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.json");
        fs::write(&source, r#"{"a":1}"#).unwrap();
        let image = dir.path().join("a.json.snapconfig");
        write_image(&Node::object(vec![("a".into(), Node::Int(1))]), &source, &image).unwrap();

        assert!(is_fresh(&source, &image));

        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&source, r#"{"a":2,"b":3}"#).unwrap();
        assert!(!is_fresh(&source, &image));
    }

    #[test]
    fn missing_image_is_not_fresh() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.json");
        fs::write(&source, r#"{}"#).unwrap();
        let image = dir.path().join("a.json.snapconfig");
        assert_eq!(check(&source, &image), Err(StaleReason::ImageMissing));
    }
}
