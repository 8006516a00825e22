// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::config::LspConfig;
use crate::errors::LspError;
use crate::lsp::catalog::{completion_items, hover_text, server_capabilities};
use crate::lsp::documents::{extract_symbols, word_at, DocumentStore, Position};
use crate::lsp::jsonrpc::{
    Message, Response, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
    SERVER_NOT_INITIALIZED,
};
use crate::lsp::LspCodec;
use crate::observability::messages::lsp::{
    DocumentEvent, RequestReceived, ServerExited, UnhandledNotification,
};
use crate::observability::messages::StructuredLog;

pub const SERVER_NAME: &str = "cognitive-architecture-lsp";
pub const SERVER_VERSION: &str = "1.0.0";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextDocumentIdentifier {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct TextDocumentItem {
    uri: String,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DidOpenParams {
    text_document: TextDocumentItem,
}

#[derive(Debug, Deserialize)]
struct ContentChange {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DidChangeParams {
    text_document: TextDocumentIdentifier,
    content_changes: Vec<ContentChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentParams {
    text_document: TextDocumentIdentifier,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionParams {
    text_document: TextDocumentIdentifier,
    position: Position,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InitializeParams {
    workspace_folders: Option<Vec<Value>>,
}

/// What the loop should do after one message
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Reply(Response),
    Silent,
    Exit(i32),
}

/// Language server for cognitive architecture sources.
///
/// Requests are handled strictly in arrival order. Everything other than
/// `initialize` and `exit` is refused until the client has initialized.
#[derive(Debug, Default)]
pub struct LanguageServer {
    config: LspConfig,
    documents: DocumentStore,
    workspace_folders: Vec<Value>,
    initialized: bool,
    shutdown_requested: bool,
}

impl LanguageServer {
    pub fn new(config: LspConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn workspace_folders(&self) -> &[Value] {
        &self.workspace_folders
    }

    /// Run until `exit` or end of input; returns the process exit code
    pub async fn serve<R, W>(&mut self, reader: R, writer: W) -> Result<i32, LspError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut frames = FramedRead::new(reader, LspCodec::new(self.config.max_frame_bytes));
        let mut sink = FramedWrite::new(writer, LspCodec::new(self.config.max_frame_bytes));

        let exit_code = loop {
            let Some(frame) = frames.next().await else {
                break self.exit_code();
            };
            match self.handle_text(&frame?) {
                Dispatch::Reply(response) => sink.send(serde_json::to_string(&response)?).await?,
                Dispatch::Silent => {}
                Dispatch::Exit(code) => break code,
            }
        };

        ServerExited {
            exit_code,
            shutdown_requested: self.shutdown_requested,
        }
        .log();
        Ok(exit_code)
    }

    fn exit_code(&self) -> i32 {
        if self.shutdown_requested {
            0
        } else {
            1
        }
    }

    /// Handle one decoded frame body
    pub fn handle_text(&mut self, text: &str) -> Dispatch {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid JSON in language server message");
                return Dispatch::Reply(Response::failure(Value::Null, PARSE_ERROR, "Parse error"));
            }
        };
        match Message::from_value(value) {
            Ok(message) => self.handle_message(message),
            Err(response) => Dispatch::Reply(response),
        }
    }

    pub fn handle_message(&mut self, message: Message) -> Dispatch {
        let id_label = message.id_label();
        RequestReceived {
            method: &message.method,
            id: id_label.as_deref(),
        }
        .log();

        match message.id {
            Some(id) => Dispatch::Reply(self.handle_request(id, &message.method, message.params)),
            None => self.handle_notification(&message.method, message.params),
        }
    }

    fn handle_request(&mut self, id: Value, method: &str, params: Value) -> Response {
        if self.shutdown_requested {
            return Response::failure(id, INVALID_REQUEST, "Server is shutting down");
        }
        if !self.initialized && method != "initialize" {
            return Response::failure(id, SERVER_NOT_INITIALIZED, "Server not initialized");
        }

        let result = match method {
            "initialize" => self.initialize(params),
            "textDocument/hover" => parse(params).map(|p| self.hover(p)),
            "textDocument/completion" => Ok(json!({
                "isIncomplete": false,
                "items": completion_items(),
            })),
            "textDocument/definition" => parse(params).map(|p: PositionParams| {
                json!(self
                    .documents
                    .definition(&p.text_document.uri, p.position))
            }),
            "textDocument/documentSymbol" => parse(params).map(|p: DocumentParams| {
                json!(self
                    .documents
                    .get(&p.text_document.uri)
                    .map(extract_symbols)
                    .unwrap_or_default())
            }),
            "shutdown" => {
                self.shutdown_requested = true;
                Ok(Value::Null)
            }
            _ => Err((METHOD_NOT_FOUND, format!("Method not found: {}", method))),
        };

        match result {
            Ok(value) => Response::success(id, value),
            Err((code, message)) => Response::failure(id, code, message),
        }
    }

    fn initialize(&mut self, params: Value) -> Result<Value, (i64, String)> {
        if self.initialized {
            return Err((INVALID_REQUEST, "Server is already initialized".to_string()));
        }
        let params: InitializeParams = if params.is_null() {
            InitializeParams::default()
        } else {
            parse(params)?
        };
        self.workspace_folders = params.workspace_folders.unwrap_or_default();
        self.initialized = true;
        tracing::info!(
            workspace_folders = self.workspace_folders.len(),
            "Language server initialized"
        );

        Ok(json!({
            "capabilities": server_capabilities(),
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        }))
    }

    fn hover(&self, params: PositionParams) -> Value {
        self.documents
            .get(&params.text_document.uri)
            .and_then(|text| word_at(text, params.position))
            .and_then(|word| hover_text(&word))
            .map(|markdown| json!({"contents": {"kind": "markdown", "value": markdown}}))
            .unwrap_or(Value::Null)
    }

    fn handle_notification(&mut self, method: &str, params: Value) -> Dispatch {
        if method == "exit" {
            return Dispatch::Exit(self.exit_code());
        }
        if !self.initialized {
            tracing::debug!(method, "Dropping notification before initialize");
            return Dispatch::Silent;
        }

        let outcome = match method {
            "initialized" => Ok(()),
            "textDocument/didOpen" => parse(params).map(|p: DidOpenParams| {
                let uri = p.text_document.uri;
                self.documents.open(uri.clone(), p.text_document.text);
                self.document_event("opened", &uri);
            }),
            "textDocument/didChange" => parse(params).map(|p: DidChangeParams| {
                let uri = p.text_document.uri;
                if let Some(last) = p.content_changes.into_iter().last() {
                    if self.documents.change(&uri, last.text) {
                        self.document_event("changed", &uri);
                    }
                }
            }),
            "textDocument/didClose" => parse(params).map(|p: DocumentParams| {
                if self.documents.close(&p.text_document.uri) {
                    self.document_event("closed", &p.text_document.uri);
                }
            }),
            _ => {
                UnhandledNotification { method }.log();
                Ok(())
            }
        };

        if let Err((_, message)) = outcome {
            tracing::warn!(method, error = %message, "Ignoring malformed notification");
        }
        Dispatch::Silent
    }

    fn document_event(&self, action: &str, uri: &str) {
        DocumentEvent {
            action,
            uri,
            open_documents: self.documents.len(),
        }
        .log();
    }
}

fn parse<T: DeserializeOwned>(params: Value) -> Result<T, (i64, String)> {
    serde_json::from_value(params).map_err(|e| (INVALID_PARAMS, format!("Invalid params: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: u64, method: &str, params: Value) -> Message {
        Message {
            id: Some(json!(id)),
            method: method.into(),
            params,
        }
    }

    fn notification(method: &str, params: Value) -> Message {
        Message {
            id: None,
            method: method.into(),
            params,
        }
    }

    fn reply(dispatch: Dispatch) -> Response {
        match dispatch {
            Dispatch::Reply(response) => response,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    fn initialized() -> LanguageServer {
        let mut server = LanguageServer::default();
        reply(server.handle_message(request(1, "initialize", json!({"workspaceFolders": [{"uri": "file:///ws", "name": "ws"}]}))));
        server.handle_message(notification("initialized", json!({})));
        server.handle_message(notification(
            "textDocument/didOpen",
            json!({"textDocument": {"uri": "file:///a.py", "languageId": "python", "version": 1, "text": "class CognitiveCity:\n    salience_score = 0.9\n"}}),
        ));
        server
    }

    #[test]
    fn test_requests_before_initialize_are_refused() {
        let mut server = LanguageServer::default();
        let response = reply(server.handle_message(request(1, "textDocument/completion", json!({}))));
        assert_eq!(response.error.unwrap().code, SERVER_NOT_INITIALIZED);
    }

    #[test]
    fn test_initialize_result() {
        let mut server = LanguageServer::default();
        let response = reply(server.handle_message(request(1, "initialize", Value::Null)));
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["capabilities"]["textDocumentSync"], 1);

        let again = reply(server.handle_message(request(2, "initialize", Value::Null)));
        assert_eq!(again.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn test_hover_on_known_term() {
        let mut server = initialized();
        assert_eq!(server.workspace_folders().len(), 1);
        let response = reply(server.handle_message(request(
            2,
            "textDocument/hover",
            json!({"textDocument": {"uri": "file:///a.py"}, "position": {"line": 1, "character": 6}}),
        )));
        let result = response.result.unwrap();
        assert_eq!(result["contents"]["kind"], "markdown");
        assert!(result["contents"]["value"]
            .as_str()
            .unwrap()
            .starts_with("**Salience Score**"));
    }

    #[test]
    fn test_did_change_last_change_wins() {
        let mut server = initialized();
        server.handle_message(notification(
            "textDocument/didChange",
            json!({"textDocument": {"uri": "file:///a.py", "version": 2},
                   "contentChanges": [{"text": "first"}, {"text": "def second():\n"}]}),
        ));
        assert_eq!(server.documents().get("file:///a.py"), Some("def second():\n"));

        server.handle_message(notification(
            "textDocument/didChange",
            json!({"textDocument": {"uri": "file:///closed.py"}, "contentChanges": [{"text": "x"}]}),
        ));
        assert_eq!(server.documents().get("file:///closed.py"), None);
    }

    #[test]
    fn test_document_symbols_and_definition() {
        let mut server = initialized();
        let symbols = reply(server.handle_message(request(
            3,
            "textDocument/documentSymbol",
            json!({"textDocument": {"uri": "file:///a.py"}}),
        )))
        .result
        .unwrap();
        assert_eq!(symbols[0]["name"], "CognitiveCity");
        assert_eq!(symbols[0]["kind"], 5);
        assert_eq!(symbols[0]["selectionRange"]["start"]["character"], 6);

        let definition = reply(server.handle_message(request(
            4,
            "textDocument/definition",
            json!({"textDocument": {"uri": "file:///a.py"}, "position": {"line": 0, "character": 10}}),
        )))
        .result
        .unwrap();
        assert_eq!(definition["uri"], "file:///a.py");
        assert_eq!(definition["range"]["end"]["character"], 19);
    }

    #[test]
    fn test_invalid_params_and_unknown_methods() {
        let mut server = initialized();
        let response = reply(server.handle_message(request(5, "textDocument/hover", json!({"position": 3}))));
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

        let response = reply(server.handle_message(request(6, "workspace/symbol", json!({}))));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);

        assert_eq!(
            server.handle_message(notification("$/cancelRequest", json!({"id": 6}))),
            Dispatch::Silent
        );
    }

    #[test]
    fn test_parse_error() {
        let mut server = LanguageServer::default();
        let response = reply(server.handle_text("{not json"));
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[test]
    fn test_exit_code_depends_on_shutdown() {
        let mut server = initialized();
        assert_eq!(server.handle_message(notification("exit", Value::Null)), Dispatch::Exit(1));

        let response = reply(server.handle_message(request(9, "shutdown", Value::Null)));
        assert_eq!(response.result, Some(Value::Null));
        let after = reply(server.handle_message(request(10, "textDocument/completion", json!({}))));
        assert_eq!(after.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(server.handle_message(notification("exit", Value::Null)), Dispatch::Exit(0));
    }
}
