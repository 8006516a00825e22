// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::utils::short_hash;

/// Toolchain that turns a component's sources into outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildSystem {
    #[default]
    Generic,
    PytorchTrainer,
    ProtocolCompiler,
    CognitiveAssembler,
}

impl BuildSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildSystem::Generic => "generic",
            BuildSystem::PytorchTrainer => "pytorch_trainer",
            BuildSystem::ProtocolCompiler => "protocol_compiler",
            BuildSystem::CognitiveAssembler => "cognitive_assembler",
        }
    }
}

/// How a component is built: what it consumes, what it produces, and with which settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildProcedure {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub build_system: BuildSystem,
    pub configuration: BTreeMap<String, Value>,
    pub environment: BTreeMap<String, String>,
}

/// A node of the build graph, pinned to the hash of its source specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildComponent {
    pub name: String,
    pub version: String,
    pub source_hash: String,
    pub build_inputs: Vec<String>,
    pub build_outputs: Vec<String>,
    pub build_system: BuildSystem,
    pub configuration: BTreeMap<String, Value>,
    pub environment_variables: BTreeMap<String, String>,
}

impl BuildComponent {
    pub fn from_procedure(
        name: impl Into<String>,
        version: impl Into<String>,
        source_hash: String,
        procedure: BuildProcedure,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source_hash,
            build_inputs: procedure.inputs,
            build_outputs: procedure.outputs,
            build_system: procedure.build_system,
            configuration: procedure.configuration,
            environment_variables: procedure.environment,
        }
    }

    /// Registry key: `{name}-{version}-{first 8 chars of source hash}`
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.name,
            self.version,
            short_hash(&self.source_hash, 8)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_uses_hash_prefix() {
        let component = BuildComponent::from_procedure(
            "tokenizer",
            "2.1.0",
            "0123456789abcdef".into(),
            BuildProcedure::default(),
        );
        assert_eq!(component.key(), "tokenizer-2.1.0-01234567");
        assert_eq!(component.build_system, BuildSystem::Generic);
    }

    #[test]
    fn test_procedure_defaults_when_fields_missing() {
        let procedure: BuildProcedure =
            serde_json::from_str(r#"{"build_system": "protocol_compiler"}"#).unwrap();
        assert_eq!(procedure.build_system, BuildSystem::ProtocolCompiler);
        assert!(procedure.inputs.is_empty());
        assert_eq!(procedure.build_system.as_str(), "protocol_compiler");
    }
}
