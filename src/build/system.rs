// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::build::{BuildComponent, BuildConfig, BuildManifest};

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_random_seeds() -> Vec<u64> {
    vec![42, 1337, 2023]
}

fn default_training_script() -> String {
    "train.py".to_string()
}

fn default_evaluation_script() -> String {
    "evaluate.py".to_string()
}

fn default_language() -> String {
    "python".to_string()
}

fn default_assembly() -> String {
    "modular".to_string()
}

fn default_optimization() -> String {
    "balanced".to_string()
}

/// Trained model described by architecture, data and hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub architecture: String,
    pub training_data: String,
    #[serde(default)]
    pub hyperparameters: BTreeMap<String, Value>,
    #[serde(default = "default_random_seeds")]
    pub random_seeds: Vec<u64>,
    #[serde(default = "default_training_script")]
    pub training_script: String,
    #[serde(default = "default_evaluation_script")]
    pub evaluation_script: String,
    #[serde(default)]
    pub validation: Map<String, Value>,
    /// Other system components this model is built from
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Protocol implementation generated from a definition and its interfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSpec {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub definition: String,
    pub interfaces: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub templates: Map<String, Value>,
    #[serde(default)]
    pub validation: Map<String, Value>,
    #[serde(default)]
    pub performance: Map<String, Value>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Cognitive architecture assembled from modules around a topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureSpec {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub modules: Vec<String>,
    pub topology: String,
    #[serde(default)]
    pub knowledge_bases: Vec<String>,
    #[serde(default)]
    pub reasoning_engines: Vec<String>,
    #[serde(default = "default_assembly")]
    pub assembly: String,
    #[serde(default = "default_optimization")]
    pub optimization: String,
    #[serde(default)]
    pub validation: Map<String, Value>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Whole AI system: models, protocols, architectures and deployment scenarios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSpecification {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub protocols: Vec<ProtocolSpec>,
    #[serde(default)]
    pub architectures: Vec<ArchitectureSpec>,
    #[serde(default)]
    pub deployment_scenarios: BTreeMap<String, BuildConfig>,
}

/// Named benchmark description grouped by category
pub type BenchmarkSuites = BTreeMap<String, BTreeMap<String, String>>;

/// Everything needed to reproduce an AI system, one manifest per scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemBlueprint {
    pub system_name: String,
    pub system_version: String,
    /// Blueprint key (`model_*`, `protocol_*`, `architecture_*`) -> component
    pub components: BTreeMap<String, BuildComponent>,
    pub build_manifests: BTreeMap<String, BuildManifest>,
    pub benchmark_suites: BenchmarkSuites,
}

pub fn model_key(name: &str) -> String {
    format!("model_{}", name)
}

pub fn protocol_key(name: &str) -> String {
    format!("protocol_{}", name)
}

pub fn architecture_key(name: &str) -> String {
    format!("architecture_{}", name)
}

const BENCHMARKS: [(&str, [(&str, &str); 3]); 3] = [
    (
        "performance_benchmarks",
        [
            ("latency_tests", "measure response times"),
            ("throughput_tests", "measure request handling capacity"),
            ("memory_tests", "measure memory usage patterns"),
        ],
    ),
    (
        "accuracy_benchmarks",
        [
            ("model_accuracy", "measure model prediction accuracy"),
            ("protocol_correctness", "verify protocol compliance"),
            ("system_integration", "test end-to-end functionality"),
        ],
    ),
    (
        "reproducibility_benchmarks",
        [
            ("build_determinism", "verify bit-for-bit reproducibility"),
            ("environment_isolation", "test environment independence"),
            ("version_consistency", "verify version compatibility"),
        ],
    ),
];

pub(crate) fn benchmark_suites() -> BenchmarkSuites {
    BENCHMARKS
        .iter()
        .map(|(suite, tests)| {
            let tests = tests
                .iter()
                .map(|(name, description)| (name.to_string(), description.to_string()))
                .collect();
            (suite.to_string(), tests)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_spec_defaults() {
        let spec: ModelSpec = serde_yaml::from_str(
            r#"
name: tiny
architecture: mlp
training_data: toy
"#,
        )
        .unwrap();
        assert_eq!(spec.version, "1.0.0");
        assert_eq!(spec.random_seeds, vec![42, 1337, 2023]);
        assert_eq!(spec.training_script, "train.py");
        assert!(spec.depends_on.is_empty());
    }

    #[test]
    fn test_benchmark_suites_shape() {
        let suites = benchmark_suites();
        assert_eq!(suites.len(), 3);
        assert_eq!(suites["reproducibility_benchmarks"].len(), 3);
    }
}
