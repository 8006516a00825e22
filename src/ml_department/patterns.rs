// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Enterprise ML practice the department knows how to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseMlPattern {
    pub name: String,
    /// `nlp`, `vision`, `multimodal` or `reasoning`
    pub domain: String,
    /// `architecture`, `training`, `optimization` or `deployment`
    pub pattern_type: String,
    pub description: String,
    pub implementation: Map<String, Value>,
    pub enterprise_constraints: Map<String, Value>,
    pub performance_characteristics: BTreeMap<String, f64>,
    pub adoption_rate: f64,
}

/// Model configuration derived from a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpecialization {
    pub model_family: String,
    pub specialization_domain: String,
    pub base_architecture: String,
    pub enterprise_modifications: Vec<String>,
    pub performance_targets: BTreeMap<String, f64>,
    pub compliance_requirements: Vec<String>,
    pub deployment_constraints: Map<String, Value>,
}

impl From<&EnterpriseMlPattern> for ModelSpecialization {
    fn from(pattern: &EnterpriseMlPattern) -> Self {
        let model_family = pattern
            .implementation
            .get("base_model")
            .and_then(Value::as_str)
            .unwrap_or("transformer")
            .to_string();
        let enterprise_modifications = pattern
            .implementation
            .get("enterprise_extensions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            model_family,
            specialization_domain: pattern.domain.clone(),
            base_architecture: pattern.name.clone(),
            enterprise_modifications,
            performance_targets: pattern.performance_characteristics.clone(),
            compliance_requirements: pattern.enterprise_constraints.keys().cloned().collect(),
            deployment_constraints: pattern.enterprise_constraints.clone(),
        }
    }
}

/// Optimization potential of a pattern found in a codebase
pub(crate) fn optimization_potential(pattern: &str) -> f64 {
    match pattern {
        "transformer_usage" => 0.8,
        "fine_tuning_pipelines" => 0.6,
        "model_serving_patterns" => 0.9,
        "data_preprocessing_pipelines" => 0.7,
        _ => 0.5,
    }
}

/// Codebase features the analysis recognizes, in report order
pub(crate) const KNOWN_CODEBASE_PATTERNS: [&str; 5] = [
    "transformer_usage",
    "fine_tuning_pipelines",
    "model_serving_patterns",
    "data_preprocessing_pipelines",
    "evaluation_frameworks",
];

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn scores(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub(crate) fn enterprise_transformer() -> EnterpriseMlPattern {
    EnterpriseMlPattern {
        name: "Enterprise Transformer Architecture".to_string(),
        domain: "nlp".to_string(),
        pattern_type: "architecture".to_string(),
        description: "Transformer optimized for enterprise code understanding and generation"
            .to_string(),
        implementation: object(json!({
            "base_model": "transformer",
            "attention_heads": 16,
            "hidden_size": 768,
            "num_layers": 12,
            "enterprise_extensions": [
                "code_context_attention",
                "enterprise_vocab_extension",
                "compliance_aware_generation"
            ]
        })),
        enterprise_constraints: object(json!({
            "max_latency_ms": 200,
            "memory_limit_gb": 8,
            "cpu_only_compatible": true,
            "privacy_preserving": true
        })),
        performance_characteristics: scores(&[
            ("code_completion_accuracy", 0.85),
            ("context_understanding", 0.90),
            ("enterprise_pattern_recognition", 0.88),
        ]),
        adoption_rate: 0.75,
    }
}

pub(crate) fn multimodal_code_understanding() -> EnterpriseMlPattern {
    EnterpriseMlPattern {
        name: "Multimodal Code Understanding".to_string(),
        domain: "multimodal".to_string(),
        pattern_type: "architecture".to_string(),
        description: "Combined text, visual, and structural code understanding".to_string(),
        implementation: object(json!({
            "text_encoder": "transformer_encoder",
            "visual_encoder": "vision_transformer",
            "structure_encoder": "graph_neural_network",
            "fusion_mechanism": "cross_attention_fusion",
            "enterprise_features": [
                "diagram_to_code_mapping",
                "architectural_pattern_recognition",
                "visual_debugging_support"
            ]
        })),
        enterprise_constraints: object(json!({
            "supports_enterprise_diagrams": true,
            "integrates_with_enterprise_tools": true,
            "maintains_code_confidentiality": true
        })),
        performance_characteristics: scores(&[
            ("multimodal_understanding", 0.82),
            ("architecture_recognition", 0.87),
            ("visual_code_alignment", 0.79),
        ]),
        adoption_rate: 0.60,
    }
}
