// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{json, Value};

use crate::mcp::MessageType;

pub const PROTOCOL_VERSION: &str = "cognitive_architecture_v1.0";

pub const STUDY_TYPES: [&str; 3] = ["ml_concepts", "nn_architectures", "cognitive_architecture"];
pub const QUERY_TYPES: [&str; 3] = [
    "activation_landscape",
    "memory_patterns",
    "neural_transport_status",
];

/// Study material for a study type, `None` when the type has no content yet
pub fn study_content(study_type: &str, topic: &str) -> Option<Value> {
    match study_type {
        "ml_concepts" => Some(ml_concepts(topic)),
        "nn_architectures" => Some(json!({
            "architecture_type": topic,
            "description": format!("Neural network architecture study for {}", topic),
            "implementation_notes": "PyTorch-based implementation examples",
            "research_papers": ["Attention Is All You Need", "ResNet", "BERT"]
        })),
        "cognitive_architecture" => Some(json!({
            "cognitive_pattern": topic,
            "description": "Cognitive architecture design patterns",
            "implementation": "GitHub Enterprise cognitive ecology",
            "neural_transport_channels": ["cogpilot", "cogcities", "cosmo-enterprise"]
        })),
        _ => None,
    }
}

fn ml_concepts(topic: &str) -> Value {
    match topic {
        "hello_world" => json!({
            "concept": "Introduction to Machine Learning",
            "description": "Basic ML concepts and PyTorch introduction",
            "example_code": "model = nn.Linear(10, 1)\noutput = model(torch.randn(1, 10))",
            "key_points": ["Tensors", "Neural Networks", "Forward Pass"]
        }),
        "neural_networks" => json!({
            "concept": "Neural Network Architectures",
            "description": "Understanding different neural network types",
            "example_code": "class MLP(nn.Module):\n    def __init__(self):\n        super().__init__()",
            "key_points": ["Layers", "Activation Functions", "Backpropagation"]
        }),
        other => json!({
            "concept": format!("Study topic: {}", other),
            "description": "Custom study content",
            "note": "Content generation for this topic is in development"
        }),
    }
}

/// Result of a cognitive architecture query, `None` for unknown query types
pub fn query_result(query_type: &str) -> Option<Value> {
    match query_type {
        "activation_landscape" => Some(json!({
            "current_activations": {
                "ml_architecture": 0.87,
                "protocol_design": 0.92,
                "neural_transport": 0.74
            },
            "trending_patterns": ["cognitive_cities", "enterprise_ai"],
            "optimization_suggestions": ["increase_neural_bandwidth", "distribute_processing"]
        })),
        "memory_patterns" => Some(json!({
            "active_patterns": 15,
            "average_salience": 0.78,
            "memory_utilization": "moderate",
            "embedding_dimensions": 768,
            "recent_encodings": ["particle_swarm_optimization", "neural_transport"]
        })),
        "neural_transport_status" => Some(json!({
            "active_channels": 3,
            "total_bandwidth": "high",
            "channel_health": {
                "cogpilot_to_cogcities": "excellent",
                "cogpilot_to_enterprise": "good",
                "inter_org_sync": "optimal"
            },
            "transport_volume_24h": 1247
        })),
        _ => None,
    }
}

pub fn capabilities() -> Value {
    let message_types: Vec<&str> = MessageType::ALL.iter().map(|t| t.as_str()).collect();
    json!({
        "supported_message_types": message_types,
        "study_types": STUDY_TYPES,
        "query_types": QUERY_TYPES,
        "transport_features": ["high_bandwidth", "semantic_routing", "context_preservation"]
    })
}

pub fn performance() -> Value {
    json!({
        "average_response_time_ms": 25,
        "message_throughput": "high",
        "error_rate": 0.02,
        "bandwidth_efficiency": 0.91,
        "client_satisfaction": 0.96
    })
}
