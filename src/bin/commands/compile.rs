// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `snapconfig compile` implementation.

use anyhow::{Context, Result};
use std::path::Path;

pub fn execute(source: &Path, destination: &Path) -> Result<()> {
    let path = snapconfig::compile(source, destination)
        .with_context(|| format!("failed to compile {}", source.display()))?;
    println!("{}", path.display());
    Ok(())
}
