// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod hashing;

pub use hashing::{canonical_hash, canonical_json, sha256_hex, short_hash};
