// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the WebSocket protocol server.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Server bound its listener.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServerListening<'a> {
    pub address: &'a str,
}

impl Display for ServerListening<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "MCP server listening on ws://{}", self.address)
    }
}

impl StructuredLog for ServerListening<'_> {
    fn log(&self) {
        tracing::info!(address = self.address, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("mcp_server", span_name = name, address = self.address)
    }
}

/// A client completed the WebSocket handshake.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ClientConnected<'a> {
    pub client_id: &'a str,
    pub peer: &'a str,
    pub active_clients: usize,
}

impl Display for ClientConnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Client {} connected from {} ({} active)",
            self.client_id, self.peer, self.active_clients
        )
    }
}

impl StructuredLog for ClientConnected<'_> {
    fn log(&self) {
        tracing::info!(
            client_id = self.client_id,
            peer = self.peer,
            active_clients = self.active_clients,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "mcp_client",
            span_name = name,
            client_id = self.client_id,
            peer = self.peer,
        )
    }
}

/// A client went away and was removed from the registry.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ClientDisconnected<'a> {
    pub client_id: &'a str,
    pub active_clients: usize,
}

impl Display for ClientDisconnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Client {} disconnected ({} active)",
            self.client_id, self.active_clients
        )
    }
}

impl StructuredLog for ClientDisconnected<'_> {
    fn log(&self) {
        tracing::info!(
            client_id = self.client_id,
            active_clients = self.active_clients,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("mcp_client", span_name = name, client_id = self.client_id)
    }
}

/// An inbound message was routed to its handler.
///
/// # Log Level
/// `debug!` - Emitted for every frame
pub struct MessageDispatched<'a> {
    pub client_id: &'a str,
    pub message_type: &'a str,
}

impl Display for MessageDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatching '{}' message from client {}",
            self.message_type, self.client_id
        )
    }
}

impl StructuredLog for MessageDispatched<'_> {
    fn log(&self) {
        tracing::debug!(
            client_id = self.client_id,
            message_type = self.message_type,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "mcp_dispatch",
            span_name = name,
            client_id = self.client_id,
            message_type = self.message_type,
        )
    }
}

/// A client connection ended with an error.
///
/// # Log Level
/// `warn!` - The server keeps running
pub struct ConnectionFailed<'a> {
    pub client_id: &'a str,
    pub error: &'a str,
}

impl Display for ConnectionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Connection for client {} failed: {}", self.client_id, self.error)
    }
}

impl StructuredLog for ConnectionFailed<'_> {
    fn log(&self) {
        tracing::warn!(client_id = self.client_id, error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("mcp_client", span_name = name, client_id = self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_display() {
        let connected = ClientConnected {
            client_id: "c-1",
            peer: "127.0.0.1:5000",
            active_clients: 3,
        };
        assert_eq!(
            connected.to_string(),
            "Client c-1 connected from 127.0.0.1:5000 (3 active)"
        );

        let gone = ClientDisconnected {
            client_id: "c-1",
            active_clients: 2,
        };
        assert_eq!(gone.to_string(), "Client c-1 disconnected (2 active)");
    }
}
