// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pluggable implementations of the crate's async seams.
//!
//! * `store` - `BuildBackend` that derives artifacts in a content-addressed store
//! * `channel` - `ContextTransmitter` that records packets in memory
//! * `stub` - failing and tampering backends for executor tests (test builds only)

pub mod channel;
pub mod store;
#[cfg(test)]
pub mod stub;

pub use channel::RecordingTransmitter;
pub use store::ContentStoreBackend;
