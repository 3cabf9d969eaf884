// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `snapconfig env load` and `snapconfig env parse` implementations.

use anyhow::{Context, Result};
use std::path::Path;

pub fn load(path: &Path, no_override: bool) -> Result<()> {
    let count = snapconfig::load_dotenv(path, !no_override)
        .with_context(|| format!("failed to load dotenv file {}", path.display()))?;
    println!("{} variable(s) written to the process environment", count);
    Ok(())
}

pub fn parse(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = snapconfig::parse_env(&text).context("failed to parse dotenv text")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
