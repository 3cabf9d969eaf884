// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! snapconfig CLI tool.
//!
//! Command-line interface for compiling and inspecting precompiled
//! configuration images.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{cache, compile, dump, env, load, shell};

#[derive(Parser)]
#[command(name = "snapconfig")]
#[command(author = "Vivian Voss <ask@vvoss.dev>")]
#[command(version = "0.1.0")]
#[command(about = "snapconfig CLI - precompiled configuration loader", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a source (compiling or reusing its cached image) and print a
    /// value as JSON
    Load {
        /// Path to the configuration source
        source: PathBuf,

        /// Recompile even if the cached image looks fresh
        #[arg(long)]
        force_recompile: bool,

        /// Overrides the default `<source>.snapconfig` sidecar location
        #[arg(long)]
        cache_path: Option<PathBuf>,

        /// Overrides extension-based format detection (json|yaml|toml|ini|env)
        #[arg(long)]
        format: Option<String>,

        /// Dotted path into the loaded value (defaults to the whole tree)
        #[arg(long)]
        path: Option<String>,
    },

    /// Compile a source into a binary image unconditionally
    Compile {
        /// Path to the configuration source
        source: PathBuf,

        /// Output image path
        destination: PathBuf,
    },

    /// Load a source and print a value as JSON (alias of `load` without
    /// the compile knobs)
    Dump {
        /// Path to the configuration source
        source: PathBuf,

        /// Dotted path into the loaded value (defaults to the whole tree)
        #[arg(long)]
        path: Option<String>,
    },

    /// Report whether a source's cached image exists and is fresh
    CacheInfo {
        /// Path to the configuration source
        source: PathBuf,
    },

    /// Remove a source's cached image, if any
    ClearCache {
        /// Path to the configuration source
        source: PathBuf,
    },

    /// Open an interactive shell for exploring a loaded configuration
    Shell {
        /// Path to the configuration source
        source: PathBuf,
    },

    /// dotenv-specific operations
    #[command(subcommand)]
    Env(EnvCommands),
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Parse a dotenv file and write its keys into the process environment
    Load {
        /// Path to the dotenv file
        path: PathBuf,

        /// Skip keys already present in the environment
        #[arg(long)]
        no_override: bool,
    },
    /// Parse a dotenv file and print it as JSON, without touching the
    /// process environment
    Parse {
        /// Path to the dotenv file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            source,
            force_recompile,
            cache_path,
            format,
            path,
        } => load::execute(&source, force_recompile, cache_path, format, path)?,

        Commands::Compile { source, destination } => compile::execute(&source, &destination)?,

        Commands::Dump { source, path } => dump::execute(&source, path)?,

        Commands::CacheInfo { source } => cache::info(&source)?,

        Commands::ClearCache { source } => cache::clear(&source)?,

        Commands::Shell { source } => shell::run(&source)?,

        Commands::Env(EnvCommands::Load { path, no_override }) => env::load(&path, no_override)?,
        Commands::Env(EnvCommands::Parse { path }) => env::parse(&path)?,
    }

    Ok(())
}
