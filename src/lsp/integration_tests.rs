// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{duplex, split};
use tokio_util::codec::Framed;

use crate::config::LspConfig;
use crate::lsp::{LanguageServer, LspCodec, SERVER_NAME};

const DOCUMENT: &str = "class CognitiveCity:\n    def activation_landscape(self):\n        return self.neural_transport\n";

async fn send(client: &mut Framed<tokio::io::DuplexStream, LspCodec>, message: Value) {
    client.send(message.to_string()).await.unwrap();
}

async fn receive(client: &mut Framed<tokio::io::DuplexStream, LspCodec>) -> Value {
    let frame = client.next().await.unwrap().unwrap();
    serde_json::from_str(&frame).unwrap()
}

#[tokio::test]
async fn test_full_session_over_duplex() {
    let (client_io, server_io) = duplex(64 * 1024);
    let server = tokio::spawn(async move {
        let (reader, writer) = split(server_io);
        LanguageServer::new(LspConfig::default())
            .serve(reader, writer)
            .await
    });
    let mut client = Framed::new(client_io, LspCodec::default());

    send(
        &mut client,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"workspaceFolders": null}}),
    )
    .await;
    let init = receive(&mut client).await;
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["serverInfo"]["name"], SERVER_NAME);
    assert_eq!(init["result"]["serverInfo"]["version"], "1.0.0");

    send(&mut client, json!({"jsonrpc": "2.0", "method": "initialized", "params": {}})).await;
    send(
        &mut client,
        json!({"jsonrpc": "2.0", "method": "textDocument/didOpen",
               "params": {"textDocument": {"uri": "file:///city.py", "languageId": "python", "version": 1, "text": DOCUMENT}}}),
    )
    .await;

    send(
        &mut client,
        json!({"jsonrpc": "2.0", "id": 2, "method": "textDocument/hover",
               "params": {"textDocument": {"uri": "file:///city.py"}, "position": {"line": 2, "character": 25}}}),
    )
    .await;
    let hover = receive(&mut client).await;
    assert_eq!(hover["id"], 2);
    assert!(hover["result"]["contents"]["value"]
        .as_str()
        .unwrap()
        .starts_with("**Neural Transport**"));

    send(
        &mut client,
        json!({"jsonrpc": "2.0", "id": 3, "method": "textDocument/completion",
               "params": {"textDocument": {"uri": "file:///city.py"}, "position": {"line": 0, "character": 0}}}),
    )
    .await;
    let completion = receive(&mut client).await;
    assert_eq!(completion["result"]["isIncomplete"], false);
    assert_eq!(completion["result"]["items"].as_array().unwrap().len(), 7);

    send(
        &mut client,
        json!({"jsonrpc": "2.0", "id": 4, "method": "textDocument/documentSymbol",
               "params": {"textDocument": {"uri": "file:///city.py"}}}),
    )
    .await;
    let symbols = receive(&mut client).await;
    let symbols = symbols["result"].as_array().unwrap();
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[1]["name"], "activation_landscape");
    assert_eq!(symbols[1]["kind"], 12);
    assert_eq!(symbols[1]["range"]["start"]["character"], 4);
    assert_eq!(symbols[1]["selectionRange"]["start"]["character"], 8);

    send(&mut client, json!({"jsonrpc": "2.0", "id": 5, "method": "bogus/method"})).await;
    let unknown = receive(&mut client).await;
    assert_eq!(unknown["error"]["code"], -32601);

    send(&mut client, json!({"jsonrpc": "2.0", "id": 6, "method": "shutdown"})).await;
    let shutdown = receive(&mut client).await;
    assert_eq!(shutdown["id"], 6);
    assert_eq!(shutdown["result"], Value::Null);
    assert!(shutdown.as_object().unwrap().contains_key("result"));

    send(&mut client, json!({"jsonrpc": "2.0", "method": "exit"})).await;
    assert_eq!(server.await.unwrap().unwrap(), 0);
}

#[tokio::test]
async fn test_end_of_input_without_shutdown_exits_one() {
    let (client_io, server_io) = duplex(4096);
    let server = tokio::spawn(async move {
        let (reader, writer) = split(server_io);
        LanguageServer::default().serve(reader, writer).await
    });
    let mut client = Framed::new(client_io, LspCodec::default());
    send(&mut client, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await;
    let _ = receive(&mut client).await;
    drop(client);
    assert_eq!(server.await.unwrap().unwrap(), 1);
}

#[tokio::test]
async fn test_framing_error_ends_the_loop() {
    let (client_io, server_io) = duplex(4096);
    let server = tokio::spawn(async move {
        let (reader, writer) = split(server_io);
        LanguageServer::default().serve(reader, writer).await
    });
    let (_, mut writer) = split(client_io);
    tokio::io::AsyncWriteExt::write_all(&mut writer, b"Content-Length: nope\r\n\r\n{}")
        .await
        .unwrap();
    assert!(server.await.unwrap().is_err());
}
