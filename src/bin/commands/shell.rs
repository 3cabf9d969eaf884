// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Interactive shell (REPL) for exploring a loaded configuration by
//! dotted path.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

pub fn run(source: &Path) -> Result<()> {
    let reader = snapconfig::load(source, &snapconfig::LoadOptions::default())
        .with_context(|| format!("failed to load {}", source.display()))?;

    println!("snapconfig shell");
    println!("source: {}", source.display());
    println!("type a dotted path (e.g. database.port), .keys <path>, or .exit\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("snapconfig> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if trimmed == ".exit" || trimmed == ".quit" {
                    break;
                }
                if let Some(path) = trimmed.strip_prefix(".keys") {
                    print_keys(&reader, path.trim());
                    continue;
                }
                print_value(&reader, trimmed);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {}", e);
                break;
            }
        }
    }
    Ok(())
}

fn print_value(reader: &snapconfig::Reader, dotted_path: &str) {
    match reader.get(dotted_path).and_then(|r| r.to_native()) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        },
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn print_keys(reader: &snapconfig::Reader, dotted_path: &str) {
    let target = if dotted_path.is_empty() {
        Ok(reader.clone())
    } else {
        reader.get(dotted_path)
    };
    let keys = target.and_then(|r| {
        r.keys()?
            .map(|k| k.map(str::to_string))
            .collect::<std::result::Result<Vec<_>, _>>()
    });
    match keys {
        Ok(keys) => println!("{}", keys.join(", ")),
        Err(e) => eprintln!("Error: {}", e),
    }
}
