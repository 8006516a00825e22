// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Language server for cognitive architecture sources.
//!
//! * [`LspCodec`] - `Content-Length` framing as a tokio-util codec
//! * [`LanguageServer`] - sequential JSON-RPC loop over any async reader/writer
//!
//! The binary wires the server to stdin/stdout; logs never touch stdout.

mod catalog;
mod codec;
mod documents;
mod jsonrpc;
mod server;

#[cfg(test)]
mod integration_tests;

pub use catalog::{completion_items, hover_text, server_capabilities, CompletionItem};
pub use codec::LspCodec;
pub use documents::{
    extract_symbols, word_at, DocumentStore, DocumentSymbol, Location, Position, Range,
    SYMBOL_KIND_CLASS, SYMBOL_KIND_FUNCTION,
};
pub use jsonrpc::{
    Message, Response, ResponseError, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, SERVER_NOT_INITIALIZED,
};
pub use server::{Dispatch, LanguageServer, SERVER_NAME, SERVER_VERSION};
