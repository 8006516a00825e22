// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::build::{BuildComponent, BuildGraph};
use crate::utils::canonical_hash;

const DEFAULT_TARGET_NAME: &str = "ai_system";
const DEFAULT_TARGET_VERSION: &str = "1.0.0";
const DEFAULT_BASE_IMAGE: &str = "ubuntu:22.04";
const DEFAULT_PYTHON_VERSION: &str = "3.11";
const DEFAULT_ISOLATION_LEVEL: &str = "container";
const DEFAULT_BUILD_TOOLS: [&str; 3] = ["gcc", "make", "cmake"];

/// Per-scenario build settings.
///
/// Everything is optional; unset fields fall back to the defaults above when
/// the build environment is derived. Unknown keys are kept in `extra` so they
/// still take part in the manifest hash.
///
/// # Example
/// ```yaml
/// components: [model_transformer_language_model]
/// target_name: dev_system
/// base_image: python:3.11-slim
/// optimization: debug
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_packages: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolation_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BuildConfig {
    pub fn target_name(&self) -> &str {
        self.target_name.as_deref().unwrap_or(DEFAULT_TARGET_NAME)
    }

    pub fn target_version(&self) -> &str {
        self.target_version
            .as_deref()
            .unwrap_or(DEFAULT_TARGET_VERSION)
    }
}

/// Isolated environment a manifest is built in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildEnvironment {
    pub base_image: String,
    pub python_version: String,
    pub system_packages: Vec<String>,
    pub environment_variables: BTreeMap<String, String>,
    pub build_tools: Vec<String>,
    pub isolation_level: String,
}

impl From<&BuildConfig> for BuildEnvironment {
    fn from(config: &BuildConfig) -> Self {
        Self {
            base_image: config
                .base_image
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_IMAGE.to_string()),
            python_version: config
                .python_version
                .clone()
                .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string()),
            system_packages: config.system_packages.clone(),
            environment_variables: config.environment_variables.clone(),
            build_tools: config.build_tools.clone().unwrap_or_else(|| {
                DEFAULT_BUILD_TOOLS.iter().map(|t| t.to_string()).collect()
            }),
            isolation_level: config
                .isolation_level
                .clone()
                .unwrap_or_else(|| DEFAULT_ISOLATION_LEVEL.to_string()),
        }
    }
}

/// Complete, content-addressed description of one reproducible build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub manifest_id: String,
    pub target_name: String,
    pub target_version: String,
    pub build_timestamp: DateTime<Utc>,
    /// Registered components in build order
    pub components: Vec<BuildComponent>,
    pub dependency_graph: BuildGraph,
    pub build_environment: BuildEnvironment,
    /// Component key -> SHA-256 of the component's canonical JSON
    pub verification_checksums: BTreeMap<String, String>,
    /// Inputs that no registered component provides
    #[serde(default)]
    pub external_inputs: Vec<String>,
}

impl BuildManifest {
    pub fn component(&self, key: &str) -> Option<&BuildComponent> {
        self.components.iter().find(|c| c.key() == key)
    }

    pub fn component_keys(&self) -> Vec<String> {
        self.components.iter().map(|c| c.key()).collect()
    }
}

/// The hashed portion of a manifest (everything except the timestamp)
#[derive(Serialize)]
pub(crate) struct ManifestContent<'a> {
    pub target_components: &'a [String],
    pub build_config: &'a BuildConfig,
    pub components: &'a [BuildComponent],
    pub dependency_graph: &'a BuildGraph,
    pub build_environment: &'a BuildEnvironment,
}

/// Checksums used to detect any later change to a component definition
pub fn compute_verification_checksums(
    components: &[BuildComponent],
) -> Result<BTreeMap<String, String>, serde_json::Error> {
    components
        .iter()
        .map(|c| Ok((c.key(), canonical_hash(c)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults() {
        let env = BuildEnvironment::from(&BuildConfig::default());
        assert_eq!(env.base_image, "ubuntu:22.04");
        assert_eq!(env.python_version, "3.11");
        assert_eq!(env.build_tools, vec!["gcc", "make", "cmake"]);
        assert_eq!(env.isolation_level, "container");
    }

    #[test]
    fn test_config_keeps_unknown_keys() {
        let config: BuildConfig = serde_yaml::from_str(
            r#"
target_name: dev_system
base_image: python:3.11-slim
gpu_count: 2
"#,
        )
        .unwrap();
        assert_eq!(config.target_name(), "dev_system");
        assert_eq!(config.target_version(), "1.0.0");
        assert_eq!(config.extra.get("gpu_count"), Some(&Value::from(2)));
        assert_eq!(BuildEnvironment::from(&config).base_image, "python:3.11-slim");
    }
}
