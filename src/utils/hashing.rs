// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Render a value as compact JSON with object keys in sorted order.
///
/// The value is first converted into a `serde_json::Value`, whose maps are
/// ordered by key, so two structurally equal values always produce the same
/// text regardless of how their fields or `HashMap`s were populated.
///
/// # Example
///
/// ```rust
/// use cognitive_ecology::utils::canonical_json;
/// use serde_json::json;
///
/// let text = canonical_json(&json!({"b": 1, "a": [true, null]})).unwrap();
/// assert_eq!(text, r#"{"a":[true,null],"b":1}"#);
/// ```
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let normalized = serde_json::to_value(value)?;
    serde_json::to_string(&normalized)
}

/// Lower-case hex SHA-256 of raw bytes
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(bytes.as_ref()))
}

/// SHA-256 of the canonical JSON form of `value`
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(value)?))
}

/// First `len` characters of a hex digest (the whole digest if shorter)
pub fn short_hash(digest: &str, len: usize) -> &str {
    &digest[..len.min(digest.len())]
}
