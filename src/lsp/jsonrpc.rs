// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const SERVER_NOT_INITIALIZED: i64 = -32002;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC response. Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(ResponseError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// A parsed incoming message: a request when `id` is present, otherwise a notification
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

impl Message {
    /// Validate the envelope of a decoded JSON value.
    ///
    /// On failure returns the error response to send; the id is echoed when
    /// it could be read.
    pub fn from_value(value: Value) -> Result<Self, Response> {
        let Value::Object(mut object) = value else {
            return Err(Response::failure(
                Value::Null,
                INVALID_REQUEST,
                "Message must be a JSON object",
            ));
        };

        let id = match object.remove("id") {
            None => None,
            Some(id @ (Value::Number(_) | Value::String(_))) => Some(id),
            Some(_) => {
                return Err(Response::failure(
                    Value::Null,
                    INVALID_REQUEST,
                    "Request id must be a number or a string",
                ))
            }
        };

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return Err(Response::failure(
                    id.unwrap_or(Value::Null),
                    INVALID_REQUEST,
                    "Message has no method",
                ))
            }
        };

        Ok(Self {
            id,
            method,
            params: object.remove("params").unwrap_or(Value::Null),
        })
    }

    pub fn is_request(&self) -> bool {
        self.id.is_some()
    }

    /// Request id rendered for logging
    pub fn id_label(&self) -> Option<String> {
        self.id.as_ref().map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_and_notification() {
        let request =
            Message::from_value(json!({"jsonrpc": "2.0", "id": 3, "method": "shutdown"})).unwrap();
        assert!(request.is_request());
        assert_eq!(request.id_label().as_deref(), Some("3"));
        assert_eq!(request.params, Value::Null);

        let note = Message::from_value(json!({"method": "initialized", "params": {}})).unwrap();
        assert!(!note.is_request());
    }

    #[test]
    fn test_envelope_errors() {
        let err = Message::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err.error.unwrap().code, INVALID_REQUEST);

        let err = Message::from_value(json!({"id": "a"})).unwrap_err();
        assert_eq!(err.id, json!("a"));

        let err = Message::from_value(json!({"id": {"x": 1}, "method": "m"})).unwrap_err();
        assert_eq!(err.id, Value::Null);
    }

    #[test]
    fn test_null_result_is_serialized() {
        let text = serde_json::to_string(&Response::success(json!(1), Value::Null)).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
    }
}
