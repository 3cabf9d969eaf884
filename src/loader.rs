// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The façade tying Format, Writer, Freshness, Mapper, and Reader
//! together: resolve an image path, trust it if fresh, otherwise parse
//! and recompile, then map and hand back a [`Reader`].

use crate::error::{SnapError, SnapResult};
use crate::freshness;
use crate::mapper::Mapping;
use crate::parsers::{self, Format};
use crate::reader::Reader;
use crate::value::Value;
use crate::writer;
use std::fs;
use std::path::{Path, PathBuf};

/// Knobs accepted by [`load`]. All optional; the defaults reproduce plain
/// `load(path)` with the sidecar convention and extension-based format
/// detection.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Skip the freshness check and recompile unconditionally.
    pub force_recompile: bool,
    /// Overrides the default `<path>.snapconfig` sidecar location.
    pub cache_path: Option<PathBuf>,
    /// Overrides extension-based format detection.
    pub format: Option<Format>,
}

/// What [`cache_info`] reports about a source/image pair.
#[derive(Debug, Clone)]
pub struct CacheInfo {
    pub image_path: PathBuf,
    /// Whether `source` itself is present on disk.
    pub source_exists: bool,
    pub exists: bool,
    pub fresh: bool,
    /// Byte size of the compiled image, or 0 if it doesn't exist.
    pub image_size: u64,
}

/// The default sidecar image path for `source`: `<source>.snapconfig`.
pub fn default_image_path(source: &Path) -> PathBuf {
    let mut name = source.file_name().unwrap_or_default().to_os_string();
    name.push(".snapconfig");
    source.with_file_name(name)
}

fn resolve_image_path(source: &Path, options: &LoadOptions) -> PathBuf {
    options
        .cache_path
        .clone()
        .unwrap_or_else(|| default_image_path(source))
}

/// Loads `source`, compiling (or recompiling) it into a sidecar image as
/// needed, and returns a [`Reader`] mapped onto the result.
pub fn load(source: &Path, options: &LoadOptions) -> SnapResult<Reader> {
    if !source.is_file() {
        return Err(SnapError::SourceMissing {
            path: source.display().to_string(),
        });
    }
    let image_path = resolve_image_path(source, options);

    if !options.force_recompile && freshness::is_fresh(source, &image_path) {
        match map_image(&image_path) {
            Ok(reader) => return Ok(reader),
            Err(SnapError::CorruptImage { .. }) => {
                log::warn!("{} is corrupt despite passing freshness; recompiling", image_path.display());
            }
            Err(other) => return Err(other),
        }
    }

    compile_into(source, &image_path, options.format)?;
    match map_image(&image_path) {
        Ok(reader) => Ok(reader),
        Err(SnapError::CorruptImage { reason, .. }) => {
            log::warn!("{} still corrupt after recompile: {}", image_path.display(), reason);
            Err(SnapError::CorruptImage {
                path: image_path.display().to_string(),
                reason,
            })
        }
        Err(other) => Err(other),
    }
}

/// Maps an already-compiled image directly, without consulting
/// freshness or a source file at all.
pub fn load_compiled(image_path: &Path) -> SnapResult<Reader> {
    map_image(image_path)
}

/// As [`load`], but serialized across processes via an advisory lock on
/// `source`'s sidecar lock file — opt-in for callers who'd rather wait
/// out a concurrent recompile than rely on atomic-rename safety alone.
pub fn load_locked(source: &Path, options: &LoadOptions, timeout: std::time::Duration) -> SnapResult<Reader> {
    let _guard = crate::lock::acquire(source, timeout)?;
    load(source, options)
}

/// Parses `source` and writes a fresh image at `destination`,
/// unconditionally — no freshness check. Returns `destination`.
pub fn compile(source: &Path, destination: &Path) -> SnapResult<PathBuf> {
    if !source.is_file() {
        return Err(SnapError::SourceMissing {
            path: source.display().to_string(),
        });
    }
    compile_into(source, destination, None)
}

fn compile_into(source: &Path, image_path: &Path, format_override: Option<Format>) -> SnapResult<PathBuf> {
    let format = match format_override {
        Some(format) => format,
        None => Format::detect(source)?,
    };
    let text = fs::read_to_string(source).map_err(|e| SnapError::IoError {
        operation: format!("read {}", source.display()),
        reason: e.to_string(),
    })?;
    let tree = parsers::parse(format, &text)?;
    let path = writer::write_image(&tree, source, image_path)?;
    log::info!("compiled {} ({:?}) -> {}", source.display(), format, image_path.display());
    Ok(path)
}

fn map_image(image_path: &Path) -> SnapResult<Reader> {
    let mapping = Mapping::open(image_path)?;
    Ok(Reader::at_root(mapping))
}

/// Loads a dotenv file the same way as [`load`], but always as
/// `Format::Dotenv`, and hands back a `Reader` over its flat Object —
/// cached behind the usual `<path>.snapconfig` sidecar like any other
/// source.
pub fn load_env(path: &Path) -> SnapResult<Reader> {
    let options = LoadOptions {
        format: Some(Format::Dotenv),
        ..Default::default()
    };
    load(path, &options)
}

/// Parses dotenv text directly, without touching the filesystem at all —
/// no sidecar image, no cache, just the in-memory Object.
pub fn parse_env(text: &str) -> SnapResult<Value> {
    let tree = parsers::parse(Format::Dotenv, text)?;
    Ok(Value::from(&tree))
}

/// Parses `path` as dotenv and writes each key into the process
/// environment, returning the number of variables written.
/// `override_existing = false` skips keys already set. Goes through
/// [`parse_env`] rather than [`load_env`]: a one-shot process-startup
/// read has no use for a compiled sidecar image.
pub fn load_dotenv(path: &Path, override_existing: bool) -> SnapResult<usize> {
    let value = parse_env(&read_source(path)?)?;
    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(SnapError::TypeMismatch {
                expected: "object".to_string(),
                found: kind_name(&other).to_string(),
            })
        }
    };

    let mut written = 0;
    for (key, value) in entries {
        if !override_existing && std::env::var_os(&key).is_some() {
            continue;
        }
        let rendered = render_scalar(&value);
        std::env::set_var(&key, rendered);
        written += 1;
    }
    Ok(written)
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_source(path: &Path) -> SnapResult<String> {
    if !path.is_file() {
        return Err(SnapError::SourceMissing {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| SnapError::IoError {
        operation: format!("read {}", path.display()),
        reason: e.to_string(),
    })
}

/// Removes `source`'s sidecar image, if one exists. Returns whether a
/// file was actually removed.
pub fn clear_cache(source: &Path) -> SnapResult<bool> {
    let image_path = default_image_path(source);
    match fs::remove_file(&image_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SnapError::IoError {
            operation: format!("remove {}", image_path.display()),
            reason: e.to_string(),
        }),
    }
}

/// Reports whether `source`'s sidecar image exists and is fresh, without
/// compiling anything.
pub fn cache_info(source: &Path) -> SnapResult<CacheInfo> {
    let image_path = default_image_path(source);
    let exists = image_path.is_file();
    let fresh = exists && freshness::is_fresh(source, &image_path);
    let image_size = fs::metadata(&image_path).map(|m| m.len()).unwrap_or(0);
    Ok(CacheInfo {
        image_path,
        source_exists: source.is_file(),
        exists,
        fresh,
        image_size,
    })
}
