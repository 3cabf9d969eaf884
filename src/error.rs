// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for snapconfig operations.
//!
//! Provides structured error handling with detailed context for debugging.
//! `KeyMissing`, `IndexOutOfRange`, and `TypeMismatch` are ordinary control
//! signals produced during traversal, not failures — callers are expected
//! to match on them without treating their occurrence as exceptional.

use std::fmt;

/// Standard Result type for all snapconfig operations.
pub type SnapResult<T> = Result<T, SnapError>;

/// Error types for snapconfig operations.
#[derive(Debug, Clone)]
pub enum SnapError {
    /// Source path does not exist on `load`/`compile`.
    SourceMissing { path: String },

    /// A text parser rejected its input.
    ParseError {
        format: String,
        reason: String,
        position: Option<usize>,
    },

    /// Read/write/rename/unlink/mmap failure.
    IoError { operation: String, reason: String },

    /// Image magic/version mismatch, truncated, or header fields
    /// inconsistent with file length.
    CorruptImage { path: String, reason: String },

    /// Payload exceeds 4 GiB or a container exceeds 2^32-1 children.
    CapacityExceeded { reason: String },

    /// A key or string from the abstract tree is not valid UTF-8.
    EncodingError { reason: String },

    /// Object lookup for a key not present.
    KeyMissing { key: String },

    /// Array index outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },

    /// Typed accessor called on a node whose tag does not match, or path
    /// traversal descended past a scalar.
    TypeMismatch { expected: String, found: String },

    /// Dotted-path segment does not suit the current container.
    PathTypeMismatch { segment: String, node_kind: String },
}

impl fmt::Display for SnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing { path } => {
                write!(f, "source not found: {}", path)
            }
            Self::ParseError {
                format,
                reason,
                position,
            } => match position {
                Some(pos) => write!(f, "{} parse error at byte {}: {}", format, pos, reason),
                None => write!(f, "{} parse error: {}", format, reason),
            },
            Self::IoError { operation, reason } => {
                write!(f, "I/O error during '{}': {}", operation, reason)
            }
            Self::CorruptImage { path, reason } => {
                write!(f, "corrupt image '{}': {}", path, reason)
            }
            Self::CapacityExceeded { reason } => {
                write!(f, "capacity exceeded: {}", reason)
            }
            Self::EncodingError { reason } => {
                write!(f, "encoding error: {}", reason)
            }
            Self::KeyMissing { key } => {
                write!(f, "key not found: '{}'", key)
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range (len {})", index, len)
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::PathTypeMismatch { segment, node_kind } => {
                write!(
                    f,
                    "path segment '{}' does not apply to a {}",
                    segment, node_kind
                )
            }
        }
    }
}

impl std::error::Error for SnapError {}
