// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Text-format parsing: each submodule turns one format's text into the
//! abstract [`crate::value::Node`] tree the Writer consumes. Dispatch is
//! by file extension unless the caller names a format explicitly.

mod dotenv;
mod ini;
mod json;
mod scalar;
mod toml;
mod yaml;

use crate::error::{SnapError, SnapResult};
use crate::value::Node;
use std::path::Path;

/// The formats a source file can be parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Ini,
    Dotenv,
}

impl Format {
    /// Resolves a format from a file extension (`"json"`, `"yaml"`/`"yml"`,
    /// `"toml"`, `"ini"`, `"env"`), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "ini" => Some(Format::Ini),
            "env" => Some(Format::Dotenv),
            _ => None,
        }
    }

    /// Resolves a format for `path`, preferring its extension; falls back
    /// to treating a dotfile named `.env` (no extension of its own) as
    /// dotenv.
    pub fn detect(path: &Path) -> SnapResult<Format> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(format) = Format::from_extension(ext) {
                return Ok(format);
            }
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
            return Ok(Format::Dotenv);
        }
        Err(SnapError::ParseError {
            format: "unknown".to_string(),
            reason: format!("cannot determine format for {}", path.display()),
            position: None,
        })
    }
}

/// Parses `text` as `format`, producing the abstract tree.
pub fn parse(format: Format, text: &str) -> SnapResult<Node> {
    match format {
        Format::Json => json::parse(text),
        Format::Yaml => yaml::parse(text),
        Format::Toml => toml::parse(text),
        Format::Ini => ini::parse(text),
        Format::Dotenv => dotenv::parse(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_extensions() {
        assert_eq!(Format::from_extension("JSON"), Some(Format::Json));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("bogus"), None);
    }

    #[test]
    fn detects_dotenv_by_filename() {
        let format = Format::detect(Path::new("/tmp/.env")).unwrap();
        assert_eq!(format, Format::Dotenv);
    }
}
