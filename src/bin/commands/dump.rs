// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `snapconfig dump` implementation: load, navigate, print JSON.

use anyhow::{Context, Result};
use std::path::Path;

pub fn execute(source: &Path, dotted_path: Option<String>) -> Result<()> {
    let reader = snapconfig::load(source, &snapconfig::LoadOptions::default())
        .with_context(|| format!("failed to load {}", source.display()))?;
    let target = match &dotted_path {
        Some(path) => reader.get(path).with_context(|| format!("no such path '{}'", path))?,
        None => reader,
    };
    let value = target.to_native().context("failed to materialize value")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
