// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WebSocket protocol server for cognitive architecture clients.
//!
//! Every text frame is a JSON object with a `type` field naming one of the
//! [`MessageType`]s; the reply is a single JSON object on the same socket
//! carrying an RFC 3339 `timestamp`.

mod content;
mod handlers;
mod server;


pub use content::{capabilities, performance, query_result, study_content, PROTOCOL_VERSION};
pub use handlers::{error_response, ClientInfo, McpState, MessageType, StudySession};
pub use server::McpServer;
