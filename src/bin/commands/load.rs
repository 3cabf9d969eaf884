// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `snapconfig load` implementation.

use anyhow::{Context, Result};
use snapconfig::LoadOptions;
use std::path::{Path, PathBuf};

pub fn execute(
    source: &Path,
    force_recompile: bool,
    cache_path: Option<PathBuf>,
    format: Option<String>,
    dotted_path: Option<String>,
) -> Result<()> {
    let format = format
        .map(|name| resolve_format(&name))
        .transpose()?;
    let options = LoadOptions {
        force_recompile,
        cache_path,
        format,
    };
    let reader = snapconfig::load(source, &options)
        .with_context(|| format!("failed to load {}", source.display()))?;

    let target = match &dotted_path {
        Some(path) => reader.get(path).with_context(|| format!("no such path '{}'", path))?,
        None => reader,
    };
    let value = target.to_native().context("failed to materialize value")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn resolve_format(name: &str) -> Result<snapconfig::Format> {
    snapconfig::Format::from_extension(name)
        .ok_or_else(|| anyhow::anyhow!("unrecognized format '{}'", name))
}
