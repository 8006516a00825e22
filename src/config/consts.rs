// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default bind address for the WebSocket protocol server
pub const DEFAULT_MCP_HOST: &str = "localhost";
/// Default port for the WebSocket protocol server
pub const DEFAULT_MCP_PORT: u16 = 8765;
/// Largest text frame the protocol server will accept (1 MiB)
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Largest `Content-Length` body the language server will buffer (8 MiB)
pub const DEFAULT_MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

/// Default content-addressed store prefix for build outputs
pub const DEFAULT_STORE_PATH: &str = "/nix/store";

/// Particle swarm defaults for contextual memory encoding
pub const DEFAULT_SWARM_PARTICLES: usize = 10;
pub const DEFAULT_SWARM_ITERATIONS: usize = 50;
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
pub const DEFAULT_SWARM_SEED: u64 = 42;
pub const DEFAULT_SWARM_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_SWARM_PATIENCE: usize = 10;

/// Default tracing filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
