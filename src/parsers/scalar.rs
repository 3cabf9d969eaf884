// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Scalar coercion shared by the INI and dotenv parsers: both formats are
//! "everything is a string" on the wire, and both are coerced by the
//! exact same rules.

use crate::value::Node;

/// Coerces a raw textual value (already quote-stripped, if it was quoted)
/// into the appropriate [`Node`] per the INI/dotenv rules:
///
/// - empty value → empty String
/// - `nil`/`null`/`none` (any case) → Null
/// - `true`/`false` (any case) → Bool
/// - pure decimal integer → Int
/// - otherwise → String
pub fn coerce_scalar(raw: &str) -> Node {
    if raw.is_empty() {
        return Node::String(String::new());
    }
    let lower = raw.to_ascii_lowercase();
    match lower.as_str() {
        "nil" | "null" | "none" => return Node::Null,
        "true" => return Node::Bool(true),
        "false" => return Node::Bool(false),
        _ => {}
    }
    if is_pure_decimal_integer(raw) {
        if let Ok(i) = raw.parse::<i64>() {
            return Node::Int(i);
        }
    }
    Node::String(raw.to_string())
}

/// A stricter integer check than `str::parse::<i64>`'s own tolerance
/// (which would also accept a leading `+`) — "pure decimal integer" means
/// an optional leading `-` followed by only ASCII digits.
fn is_pure_decimal_integer(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let digits = if bytes.first() == Some(&b'-') { &bytes[1..] } else { bytes };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

/// Strips one layer of matching `"…"` or `'…'` quotes, if present.
pub fn strip_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
