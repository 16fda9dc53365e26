//! Fixed-width hexadecimal rendering and numeric literal parsing.

use std::num::ParseIntError;

/// Renders a 32-bit value as exactly 8 lowercase hex digits, zero padded.
///
/// Every exported hash goes through this function so that text diffs of two
/// runs are byte-identical when the fingerprints agree.
pub fn format_hex32(value: u32) -> String {
    format!("{value:08x}")
}

/// Error returned by [`parse_u32_literal`].
#[derive(Debug, thiserror::Error)]
#[error("invalid 32-bit literal '{literal}': {source}")]
pub struct ParseLiteralError {
    /// The text that failed to parse.
    pub literal: String,
    /// The underlying integer parse failure.
    #[source]
    pub source: ParseIntError,
}

/// Parses a decimal or `0x`-prefixed hexadecimal 32-bit literal.
///
/// Underscores are accepted as digit separators (`0xdead_beef`).
pub fn parse_u32_literal(text: &str) -> Result<u32, ParseLiteralError> {
    let trimmed = text.trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != '_').collect();
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => cleaned.parse::<u32>(),
    };
    parsed.map_err(|source| ParseLiteralError {
        literal: trimmed.to_string(),
        source,
    })
}
