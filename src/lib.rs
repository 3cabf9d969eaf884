// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Precompiled configuration loader: parse a text source once, write a
//! sidecar binary image mappable with zero deserialization, and serve
//! lookups directly off the mapped bytes on every later run.
//!
//! ```no_run
//! let reader = snapconfig::load("config.json", &snapconfig::LoadOptions::default())?;
//! let port = reader.get("database.port")?.as_int()?;
//! # Ok::<(), snapconfig::SnapError>(())
//! ```

pub mod error;
pub mod format;
pub mod freshness;
pub mod loader;
pub mod lock;
pub mod mapper;
pub mod parsers;
pub mod reader;
pub mod value;
pub mod writer;

pub use error::{SnapError, SnapResult};
pub use loader::{
    cache_info, clear_cache, default_image_path, load_dotenv, load_env, parse_env, CacheInfo,
    LoadOptions,
};
pub use parsers::Format;
pub use reader::Reader;
pub use value::{Node, Value};

use std::path::Path;

/// Loads `source`, compiling or reusing its sidecar image as needed. See
/// [`LoadOptions`] for the knobs this accepts.
pub fn load(source: impl AsRef<Path>, options: &LoadOptions) -> SnapResult<Reader> {
    loader::load(source.as_ref(), options)
}

/// Maps an already-compiled image directly.
pub fn load_compiled(image_path: impl AsRef<Path>) -> SnapResult<Reader> {
    loader::load_compiled(image_path.as_ref())
}

/// As [`load`], but serialized across processes via an advisory lock on
/// `source`'s sidecar lock file.
pub fn load_locked(
    source: impl AsRef<Path>,
    options: &LoadOptions,
    timeout: std::time::Duration,
) -> SnapResult<Reader> {
    loader::load_locked(source.as_ref(), options, timeout)
}

/// Parses `source` and writes a fresh image at `destination`,
/// unconditionally.
pub fn compile(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> SnapResult<std::path::PathBuf> {
    loader::compile(source.as_ref(), destination.as_ref())
}
