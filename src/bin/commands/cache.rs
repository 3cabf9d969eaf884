// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `snapconfig cache-info` and `snapconfig clear-cache` implementations.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::Path;

pub fn info(source: &Path) -> Result<()> {
    let info = snapconfig::cache_info(source)
        .with_context(|| format!("failed to inspect cache for {}", source.display()))?;
    println!("image: {}", info.image_path.display());
    println!("source exists: {}", info.source_exists);
    println!("exists: {}", info.exists);
    println!("fresh: {}", info.fresh);
    println!("size: {}", info.image_size);
    if info.exists {
        if let Ok(modified) = std::fs::metadata(&info.image_path).and_then(|m| m.modified()) {
            println!("compiled: {}", DateTime::<Local>::from(modified).format("%Y-%m-%d %H:%M:%S"));
        }
    }
    Ok(())
}

pub fn clear(source: &Path) -> Result<()> {
    let removed = snapconfig::clear_cache(source)
        .with_context(|| format!("failed to clear cache for {}", source.display()))?;
    if removed {
        println!("removed cached image for {}", source.display());
    } else {
        println!("no cached image for {}", source.display());
    }
    Ok(())
}
