// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from the WebSocket protocol server
#[derive(Debug, Error)]
pub enum McpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the `Content-Length` framing layer of the language server
#[derive(Debug, Error)]
pub enum LspCodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Message header is missing Content-Length")]
    MissingContentLength,

    #[error("Invalid Content-Length value: {0}")]
    InvalidContentLength(String),

    #[error("Message header is not valid UTF-8")]
    InvalidHeaderEncoding,

    #[error("Malformed header line: {0}")]
    MalformedHeader(String),

    #[error("Frame of {length} bytes exceeds the {max} byte limit")]
    FrameTooLarge { length: usize, max: usize },

    #[error("Message body is not valid UTF-8")]
    InvalidBodyEncoding,
}

/// Errors that terminate the language server loop
#[derive(Debug, Error)]
pub enum LspError {
    #[error(transparent)]
    Codec(#[from] LspCodecError),

    #[error("Failed to encode message: {0}")]
    Serialization(#[from] serde_json::Error),
}
