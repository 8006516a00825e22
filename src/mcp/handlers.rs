// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::mcp::content::{capabilities, performance, query_result, study_content, PROTOCOL_VERSION};
use crate::observability::messages::mcp::MessageDispatched;
use crate::observability::messages::StructuredLog;

const TRANSPORT_BANDWIDTH_UTILIZATION: f64 = 0.85;
const TRANSPORT_LATENCY_MS: u64 = 42;

/// Message types the server dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    StudyRequest,
    CognitiveArchitectureQuery,
    NeuralTransport,
    ProtocolIntrospection,
}

impl MessageType {
    pub const ALL: [MessageType; 4] = [
        MessageType::StudyRequest,
        MessageType::CognitiveArchitectureQuery,
        MessageType::NeuralTransport,
        MessageType::ProtocolIntrospection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::StudyRequest => "study_request",
            MessageType::CognitiveArchitectureQuery => "cognitive_architecture_query",
            MessageType::NeuralTransport => "neural_transport",
            MessageType::ProtocolIntrospection => "protocol_introspection",
        }
    }
}

impl FromStr for MessageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySession {
    pub client_id: String,
    pub study_type: String,
    pub topic: String,
    pub start_time: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientInfo {
    pub peer: String,
    pub connected_at: DateTime<Utc>,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// `{"type":"error"}` reply sent to a single client
pub fn error_response(message: &str) -> Value {
    json!({
        "type": "error",
        "error": message,
        "timestamp": timestamp(),
    })
}

fn str_field<'a>(data: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Shared server state: connected clients, study sessions and counters
#[derive(Debug)]
pub struct McpState {
    clients: HashMap<String, ClientInfo>,
    /// Sessions of connected clients only; dropped on disconnect
    study_sessions: BTreeMap<String, StudySession>,
    sessions_opened: usize,
    transports: usize,
    started_at: DateTime<Utc>,
}

impl Default for McpState {
    fn default() -> Self {
        Self {
            clients: HashMap::new(),
            study_sessions: BTreeMap::new(),
            sessions_opened: 0,
            transports: 0,
            started_at: Utc::now(),
        }
    }
}

impl McpState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of connected clients afterwards
    pub fn register_client(&mut self, client_id: &str, peer: &str) -> usize {
        self.clients.insert(
            client_id.to_string(),
            ClientInfo {
                peer: peer.to_string(),
                connected_at: Utc::now(),
            },
        );
        self.clients.len()
    }

    /// Forget a client and its study sessions. Returns the number still connected.
    pub fn deregister_client(&mut self, client_id: &str) -> usize {
        self.clients.remove(client_id);
        self.study_sessions
            .retain(|_, session| session.client_id != client_id);
        self.clients.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn session(&self, session_id: &str) -> Option<&StudySession> {
        self.study_sessions.get(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.study_sessions.len()
    }

    /// Parse one text frame and build the reply
    pub fn process_message(&mut self, client_id: &str, text: &str) -> Value {
        let data = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(data)) => data,
            Ok(_) => return error_response("Message must be a JSON object"),
            Err(_) => return error_response("Invalid JSON format"),
        };

        let type_name = str_field(&data, "type", "unknown");
        MessageDispatched {
            client_id,
            message_type: type_name,
        }
        .log();

        match type_name.parse::<MessageType>() {
            Ok(MessageType::StudyRequest) => self.handle_study_request(client_id, &data),
            Ok(MessageType::CognitiveArchitectureQuery) => handle_cognitive_query(&data),
            Ok(MessageType::NeuralTransport) => self.handle_neural_transport(&data),
            Ok(MessageType::ProtocolIntrospection) => self.handle_protocol_introspection(&data),
            Err(()) => error_response(&format!("Unknown message type: {}", type_name)),
        }
    }

    fn handle_study_request(&mut self, client_id: &str, data: &Map<String, Value>) -> Value {
        let study_type = str_field(data, "study_type", "unknown");
        let topic = str_field(data, "topic", "general");

        let session_id = format!("session_{}", self.sessions_opened);
        self.sessions_opened += 1;
        self.study_sessions.insert(
            session_id.clone(),
            StudySession {
                client_id: client_id.to_string(),
                study_type: study_type.to_string(),
                topic: topic.to_string(),
                start_time: Utc::now(),
                status: "active".to_string(),
            },
        );

        let content = study_content(study_type, topic).unwrap_or_else(|| {
            json!({"message": format!("Study type '{}' not yet implemented", study_type)})
        });

        json!({
            "type": "study_response",
            "session_id": session_id,
            "study_type": study_type,
            "topic": topic,
            "content": content,
            "timestamp": timestamp(),
        })
    }

    fn handle_neural_transport(&mut self, data: &Map<String, Value>) -> Value {
        let payload = data.get("payload").cloned().unwrap_or_else(|| json!({}));
        let payload_size = serde_json::to_string(&payload).map(|s| s.len()).unwrap_or(0);
        let transport_id = format!("transport_{}", self.transports);
        self.transports += 1;

        json!({
            "type": "neural_transport_response",
            "result": {
                "transport_id": transport_id,
                "source": str_field(data, "source", "unknown"),
                "target": str_field(data, "target", "unknown"),
                "status": "transmitted",
                "bandwidth_utilization": TRANSPORT_BANDWIDTH_UTILIZATION,
                "latency_ms": TRANSPORT_LATENCY_MS,
                "payload_size": payload_size,
            },
            "timestamp": timestamp(),
        })
    }

    fn handle_protocol_introspection(&self, data: &Map<String, Value>) -> Value {
        let introspection_type = str_field(data, "introspection_type", "status");
        let result = match introspection_type {
            "status" => self.status(),
            "capabilities" => capabilities(),
            "performance" => performance(),
            other => json!({"error": format!("Unknown introspection type: {}", other)}),
        };

        json!({
            "type": "protocol_introspection_response",
            "introspection_type": introspection_type,
            "result": result,
            "timestamp": timestamp(),
        })
    }

    fn status(&self) -> Value {
        let uptime = Utc::now() - self.started_at;
        json!({
            "server_status": "running",
            "connected_clients": self.clients.len(),
            "active_sessions": self.study_sessions.len(),
            "uptime_seconds": uptime.num_seconds(),
            "protocol_version": PROTOCOL_VERSION,
        })
    }
}

fn handle_cognitive_query(data: &Map<String, Value>) -> Value {
    let query_type = str_field(data, "query_type", "general");
    let result = query_result(query_type)
        .unwrap_or_else(|| json!({"error": format!("Unknown query type: {}", query_type)}));

    json!({
        "type": "cognitive_query_response",
        "query_type": query_type,
        "result": result,
        "timestamp": timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(state: &mut McpState, message: Value) -> Value {
        state.process_message("client-1", &message.to_string())
    }

    #[test]
    fn test_dispatch_table() {
        for message_type in MessageType::ALL {
            assert_eq!(message_type.as_str().parse::<MessageType>(), Ok(message_type));
        }
        assert!("study".parse::<MessageType>().is_err());
    }

    #[test]
    fn test_study_request_opens_sessions() {
        let mut state = McpState::new();
        let first = process(
            &mut state,
            json!({"type": "study_request", "study_type": "ml_concepts", "topic": "hello_world"}),
        );
        assert_eq!(first["type"], "study_response");
        assert_eq!(first["session_id"], "session_0");
        assert_eq!(first["content"]["concept"], "Introduction to Machine Learning");

        let second = process(
            &mut state,
            json!({"type": "study_request", "study_type": "ml_concepts", "topic": "graphs"}),
        );
        assert_eq!(second["session_id"], "session_1");
        assert_eq!(second["content"]["concept"], "Study topic: graphs");
        assert_eq!(state.session_count(), 2);
        assert_eq!(state.session("session_1").unwrap().client_id, "client-1");

        let unsupported = process(&mut state, json!({"type": "study_request", "study_type": "poetry"}));
        assert_eq!(
            unsupported["content"]["message"],
            "Study type 'poetry' not yet implemented"
        );
        assert_eq!(unsupported["topic"], "general");
    }

    #[test]
    fn test_cognitive_queries() {
        let mut state = McpState::new();
        let landscape = process(
            &mut state,
            json!({"type": "cognitive_architecture_query", "query_type": "activation_landscape"}),
        );
        assert_eq!(landscape["type"], "cognitive_query_response");
        assert_eq!(landscape["result"]["current_activations"]["protocol_design"], 0.92);

        let unknown = process(
            &mut state,
            json!({"type": "cognitive_architecture_query", "query_type": "dreams"}),
        );
        assert_eq!(unknown["result"]["error"], "Unknown query type: dreams");
    }

    #[test]
    fn test_neural_transport_counts_transports() {
        let mut state = McpState::new();
        let message = json!({"type": "neural_transport", "source": "cogpilot", "target": "cogcities", "payload": {"k": "v"}});
        let first = process(&mut state, message.clone());
        assert_eq!(first["result"]["transport_id"], "transport_0");
        assert_eq!(first["result"]["status"], "transmitted");
        assert_eq!(first["result"]["payload_size"], r#"{"k":"v"}"#.len());
        assert_eq!(first["result"]["latency_ms"], 42);

        let second = process(&mut state, message);
        assert_eq!(second["result"]["transport_id"], "transport_1");
    }

    #[test]
    fn test_introspection_status_reflects_live_counts() {
        let mut state = McpState::new();
        state.register_client("client-1", "127.0.0.1:5000");
        state.register_client("client-2", "127.0.0.1:5001");
        assert_eq!(state.deregister_client("client-2"), 1);

        let status = process(&mut state, json!({"type": "protocol_introspection"}));
        assert_eq!(status["introspection_type"], "status");
        assert_eq!(status["result"]["connected_clients"], 1);
        assert_eq!(status["result"]["active_sessions"], 0);
        assert_eq!(status["result"]["protocol_version"], PROTOCOL_VERSION);

        let caps = process(
            &mut state,
            json!({"type": "protocol_introspection", "introspection_type": "capabilities"}),
        );
        assert_eq!(caps["result"]["supported_message_types"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_disconnect_drops_client_sessions() {
        let mut state = McpState::new();
        state.register_client("client-1", "127.0.0.1:5000");
        state.register_client("client-2", "127.0.0.1:5001");
        let study = json!({"type": "study_request", "study_type": "ml_concepts", "topic": "hello_world"});
        state.process_message("client-1", &study.to_string());
        state.process_message("client-2", &study.to_string());
        assert_eq!(state.session_count(), 2);

        state.deregister_client("client-1");
        assert_eq!(state.session_count(), 1);
        assert!(state.session("session_0").is_none());
        assert_eq!(state.session("session_1").unwrap().client_id, "client-2");

        // ids keep counting after a purge
        let next = state.process_message("client-2", &study.to_string());
        assert_eq!(next["session_id"], "session_2");
    }

    #[test]
    fn test_errors() {
        let mut state = McpState::new();
        let invalid = state.process_message("c", "{oops");
        assert_eq!(invalid["type"], "error");
        assert_eq!(invalid["error"], "Invalid JSON format");

        let untyped = process(&mut state, json!({"hello": "world"}));
        assert_eq!(untyped["error"], "Unknown message type: unknown");

        let unknown = process(&mut state, json!({"type": "teleport"}));
        assert_eq!(unknown["error"], "Unknown message type: teleport");
        assert!(DateTime::parse_from_rfc3339(unknown["timestamp"].as_str().unwrap()).is_ok());
    }
}
