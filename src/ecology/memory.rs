// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An organization acting as a cognitive city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveCity {
    pub name: String,
    /// Organization URL; also the key the fabric registers the city under
    pub namespace: String,
    pub specializations: Vec<String>,
    /// Channel name -> target city namespace
    pub neural_transport_channels: BTreeMap<String, String>,
    /// Encoded pattern id -> salience
    #[serde(default)]
    pub memory_patterns: BTreeMap<String, f64>,
    #[serde(default)]
    pub activation_landscape: BTreeMap<String, f64>,
    #[serde(default)]
    pub repository_count: usize,
    /// 0 for a new city; scales the swarm objective for its patterns
    #[serde(default)]
    pub cognitive_maturity: f64,
}

impl CognitiveCity {
    pub fn has_specialization(&self, specialty: &str) -> bool {
        self.specializations.iter().any(|s| s == specialty)
    }

    pub fn activation(&self, specialty: &str) -> f64 {
        self.activation_landscape
            .get(specialty)
            .copied()
            .unwrap_or(0.0)
    }

    pub(crate) fn boost(&mut self, specialty: &str, amount: f64) {
        *self
            .activation_landscape
            .entry(specialty.to_string())
            .or_insert(0.0) += amount;
    }
}

/// A trace of organizational activity waiting to be encoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualMemoryPattern {
    pub pattern_id: String,
    /// Specialization -> weight
    pub priority_profile: BTreeMap<String, f64>,
    #[serde(default)]
    pub execution_trace: Vec<Map<String, Value>>,
    /// Filled in by the swarm
    #[serde(default)]
    pub embedding_vector: Option<Vec<f64>>,
    pub salience_score: f64,
    /// Namespace of the city the pattern belongs to
    pub organization_context: String,
}
