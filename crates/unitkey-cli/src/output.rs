//! Output formatting utilities.

use serde::Serialize;

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Formats a value as RFC 8785 canonical JSON.
pub fn format_canonical_json<T: Serialize>(
    value: &T,
) -> Result<String, Box<dyn std::error::Error>> {
    let value = serde_json::to_value(value)?;
    let canonical = canonical_json::to_string(&value)
        .map_err(|e| format!("Canonical JSON encoding failed: {}", e))?;
    Ok(canonical)
}

/// Formats a digest as a `<alg>:<hex>` cache key.
pub fn format_key(alg: &str, digest: &[u8]) -> String {
    format!("{}:{}", alg, hex::encode(digest))
}
