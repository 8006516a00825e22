// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // build and transport backends
pub mod blueprint;  // workbench environment blueprints
pub mod build;      // reproducible build graph + executor
pub mod config;     // app config + system specifications
pub mod ecology;    // cognitive cities and memory encoding
pub mod enterprise; // namespace builder
pub mod errors;     // error handling
pub mod lsp;        // stdio language server
pub mod mcp;        // websocket protocol server
pub mod ml_department;
pub mod observability;
pub mod protocol_design;
pub mod traits;     // unified abstractions
pub mod transport;  // neural transport channels
pub mod utils;
