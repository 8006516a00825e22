// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the stdio language server.
//!
//! Everything here goes to stderr through the subscriber; stdout is reserved
//! for protocol frames.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A request or notification arrived.
///
/// # Log Level
/// `debug!` - Emitted for every message
pub struct RequestReceived<'a> {
    pub method: &'a str,
    /// `None` for notifications
    pub id: Option<&'a str>,
}

impl Display for RequestReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Request {} '{}'", id, self.method),
            None => write!(f, "Notification '{}'", self.method),
        }
    }
}

impl StructuredLog for RequestReceived<'_> {
    fn log(&self) {
        tracing::debug!(method = self.method, id = self.id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("lsp_request", span_name = name, method = self.method, id = self.id)
    }
}

/// A notification nobody handles was dropped.
///
/// # Log Level
/// `warn!` - Client may expect behavior the server lacks
pub struct UnhandledNotification<'a> {
    pub method: &'a str,
}

impl Display for UnhandledNotification<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Ignoring unhandled notification '{}'", self.method)
    }
}

impl StructuredLog for UnhandledNotification<'_> {
    fn log(&self) {
        tracing::warn!(method = self.method, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("lsp_notification", span_name = name, method = self.method)
    }
}

/// A document was opened, changed or closed.
///
/// # Log Level
/// `debug!` - Routine editor traffic
pub struct DocumentEvent<'a> {
    pub action: &'a str,
    pub uri: &'a str,
    pub open_documents: usize,
}

impl Display for DocumentEvent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Document {} {} ({} open)",
            self.action, self.uri, self.open_documents
        )
    }
}

impl StructuredLog for DocumentEvent<'_> {
    fn log(&self) {
        tracing::debug!(
            action = self.action,
            uri = self.uri,
            open_documents = self.open_documents,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("lsp_document", span_name = name, uri = self.uri)
    }
}

/// The server loop ended.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServerExited {
    pub exit_code: i32,
    pub shutdown_requested: bool,
}

impl Display for ServerExited {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Language server exiting with code {} (shutdown requested: {})",
            self.exit_code, self.shutdown_requested
        )
    }
}

impl StructuredLog for ServerExited {
    fn log(&self) {
        tracing::info!(
            exit_code = self.exit_code,
            shutdown_requested = self.shutdown_requested,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("lsp_exit", span_name = name, exit_code = self.exit_code)
    }
}
