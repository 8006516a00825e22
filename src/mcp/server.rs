// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async_with_config, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::McpConfig;
use crate::errors::McpError;
use crate::mcp::{error_response, McpState};
use crate::observability::messages::mcp::{
    ClientConnected, ClientDisconnected, ConnectionFailed, ServerListening,
};
use crate::observability::messages::StructuredLog;

/// WebSocket server for cognitive architecture clients.
///
/// One task per connection; all tasks share [`McpState`] behind a mutex and
/// write replies straight to their own socket.
pub struct McpServer {
    config: McpConfig,
    state: Arc<Mutex<McpState>>,
}

impl McpServer {
    pub fn new(config: McpConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(McpState::new())),
        }
    }

    pub fn state(&self) -> Arc<Mutex<McpState>> {
        Arc::clone(&self.state)
    }

    pub async fn bind(&self) -> Result<TcpListener, McpError> {
        Ok(TcpListener::bind(self.config.bind_address()).await?)
    }

    /// Bind, then serve until Ctrl-C
    pub async fn run(&self) -> Result<(), McpError> {
        let listener = self.bind().await?;
        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
            }
            trigger.cancel();
        });
        self.serve(listener, shutdown).await
    }

    /// Accept connections until `shutdown` fires, then close every client
    /// and wait for their tasks.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), McpError> {
        let address = listener.local_addr()?.to_string();
        ServerListening { address: &address }.log();

        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(self.config.max_message_bytes);
        ws_config.max_frame_size = Some(self.config.max_message_bytes);

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };
                    connections.spawn(handle_connection(
                        stream,
                        peer,
                        ws_config.clone(),
                        Arc::clone(&self.state),
                        shutdown.clone(),
                    ));
                }
            }
        }

        while connections.join_next().await.is_some() {}
        tracing::info!("MCP server stopped");
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    ws_config: WebSocketConfig,
    state: Arc<Mutex<McpState>>,
    shutdown: CancellationToken,
) {
    let client_id = Uuid::new_v4().to_string();
    let peer = peer.to_string();

    let ws = match accept_async_with_config(stream, Some(ws_config)).await {
        Ok(ws) => ws,
        Err(e) => {
            ConnectionFailed {
                client_id: &client_id,
                error: &e.to_string(),
            }
            .log();
            return;
        }
    };

    let connected = ClientConnected {
        client_id: &client_id,
        peer: &peer,
        active_clients: state.lock().await.register_client(&client_id, &peer),
    };
    connected.log();
    let span = connected.span("connection");

    if let Err(e) = client_loop(ws, &client_id, &state, &shutdown)
        .instrument(span)
        .await
    {
        ConnectionFailed {
            client_id: &client_id,
            error: &e.to_string(),
        }
        .log();
    }

    let active_clients = state.lock().await.deregister_client(&client_id);
    ClientDisconnected {
        client_id: &client_id,
        active_clients,
    }
    .log();
}

async fn client_loop(
    mut ws: WebSocketStream<TcpStream>,
    client_id: &str,
    state: &Mutex<McpState>,
    shutdown: &CancellationToken,
) -> Result<(), McpError> {
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => {
                ws.close(None).await?;
                return Ok(());
            }
            frame = ws.next() => frame,
        };

        let reply = match frame {
            None | Some(Ok(Message::Close(_))) => return Ok(()),
            Some(Err(e)) => return Err(e.into()),
            Some(Ok(Message::Text(text))) => state.lock().await.process_message(client_id, &text),
            Some(Ok(Message::Binary(_))) => error_response("Binary frames are not supported"),
            // ping/pong are answered by the protocol layer
            Some(Ok(_)) => continue,
        };
        ws.send(Message::Text(serde_json::to_string(&reply)?)).await?;
    }
}
