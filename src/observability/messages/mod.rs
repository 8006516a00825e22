// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `build` - component registration, manifests and build execution
//! * `mcp` - WebSocket server lifecycle and message dispatch
//! * `lsp` - language server lifecycle and request handling
//! * `transport` - neural channel lifecycle and context transmission
//!
//! # Usage Pattern
//!
//! ```rust
//! use cognitive_ecology::observability::messages::build::ManifestGenerated;
//! use cognitive_ecology::observability::messages::StructuredLog;
//!
//! let msg = ManifestGenerated {
//!     manifest_id: "3f2a...",
//!     target_name: "dev_system",
//!     component_count: 2,
//!     external_input_count: 6,
//! };
//!
//! msg.log();
//! ```

pub mod build;
pub mod lsp;
pub mod mcp;
pub mod transport;

use tracing::Span;

/// Emit a message with its fields attached, or open a span carrying them.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
