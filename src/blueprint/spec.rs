// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::BlueprintError;

/// Kind of AI workbench a blueprint provisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkbenchType {
    MlResearch,
    NnDevelopment,
    ProtocolDesign,
    HybridWorkbench,
}

impl WorkbenchType {
    pub const ALL: [WorkbenchType; 4] = [
        WorkbenchType::MlResearch,
        WorkbenchType::NnDevelopment,
        WorkbenchType::ProtocolDesign,
        WorkbenchType::HybridWorkbench,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkbenchType::MlResearch => "ml_research",
            WorkbenchType::NnDevelopment => "nn_development",
            WorkbenchType::ProtocolDesign => "protocol_design",
            WorkbenchType::HybridWorkbench => "hybrid_workbench",
        }
    }

    pub(crate) fn includes_ml(&self) -> bool {
        matches!(
            self,
            WorkbenchType::MlResearch | WorkbenchType::NnDevelopment | WorkbenchType::HybridWorkbench
        )
    }

    pub(crate) fn includes_protocols(&self) -> bool {
        matches!(
            self,
            WorkbenchType::ProtocolDesign | WorkbenchType::HybridWorkbench
        )
    }
}

impl fmt::Display for WorkbenchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkbenchType {
    type Err = BlueprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkbenchType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlueprintError::UnknownWorkbenchType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for ExportFormat {
    type Err = BlueprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "json" => Ok(ExportFormat::Json),
            other => Err(BlueprintError::UnknownExportFormat(other.to_string())),
        }
    }
}

/// One package installed into a workbench environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
    /// URL, git repository or local path
    pub source: String,
    /// `python`, `nodejs`, `cargo`, `make`, `java`, ...
    pub build_system: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub build_args: BTreeMap<String, Value>,
    #[serde(default)]
    pub patches: Vec<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl PackageSpec {
    pub(crate) fn new(
        name: &str,
        version: &str,
        source: &str,
        build_system: &str,
        dependencies: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            source: source.to_string(),
            build_system: build_system.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            build_args: BTreeMap::new(),
            patches: Vec::new(),
            environment: BTreeMap::new(),
            checksum: None,
        }
    }

    /// A version counts as pinned unless it is empty or `latest`
    pub fn is_pinned(&self) -> bool {
        !self.version.is_empty() && self.version != "latest"
    }
}

/// Long-running process started inside the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub command: String,
    /// `host:container` mappings
    pub ports: Vec<String>,
    pub health_check: String,
}

impl ServiceSpec {
    /// Container side of the first port mapping
    pub fn exposed_port(&self) -> Option<&str> {
        self.ports
            .first()
            .map(|mapping| mapping.rsplit(':').next().unwrap_or(mapping))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub name: String,
    pub description: String,
    pub base_system: String,
    pub packages: Vec<PackageSpec>,
    pub environment_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default)]
    pub network_config: Map<String, Value>,
    #[serde(default)]
    pub ai_specific: BTreeMap<String, Value>,
}

/// Enterprise overrides applied on top of a workbench template.
///
/// Every field is optional; an all-default config means "no customizations".
///
/// # Example
/// ```yaml
/// pytorch_version: 2.1.0
/// gpu_support: true
/// base_system: ubuntu:24.04
/// min_replicas: 2
/// environment_vars:
///   COMPLIANCE_MODE: strict
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnterpriseConfig {
    pub base_system: Option<String>,
    pub pytorch_version: Option<String>,
    pub transformers_version: Option<String>,
    pub datasets_version: Option<String>,
    pub torchvision_version: Option<String>,
    pub node_version: Option<String>,
    pub mcp_version: Option<String>,
    pub environment_vars: BTreeMap<String, String>,
    pub enterprise_ml_packages: Vec<PackageSpec>,
    pub gpu_support: Option<bool>,
    pub distributed_training: Option<bool>,
    pub model_parallelism: Option<bool>,
    pub memory_optimization: Option<bool>,
    pub enterprise_integration: Option<bool>,
    pub container_runtime: Option<String>,
    pub orchestration: Option<String>,
    pub min_replicas: Option<u32>,
    pub max_replicas: Option<u32>,
    pub target_cpu: Option<u32>,
    pub service_mesh: Option<bool>,
    pub load_balancer: Option<String>,
    pub security_context: Map<String, Value>,
    pub network_policies: Vec<Value>,
}

impl EnterpriseConfig {
    pub fn has_customizations(&self) -> bool {
        self != &EnterpriseConfig::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub target_cpu: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkingConfig {
    pub service_mesh: bool,
    pub load_balancer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub pod_security_context: Map<String, Value>,
    pub network_policies: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub container_runtime: String,
    pub orchestration: String,
    pub scaling: ScalingConfig,
    pub networking: NetworkingConfig,
    pub security: SecurityConfig,
}

impl From<&EnterpriseConfig> for DeploymentConfig {
    fn from(config: &EnterpriseConfig) -> Self {
        Self {
            container_runtime: config
                .container_runtime
                .clone()
                .unwrap_or_else(|| "docker".to_string()),
            orchestration: config
                .orchestration
                .clone()
                .unwrap_or_else(|| "kubernetes".to_string()),
            scaling: ScalingConfig {
                min_replicas: config.min_replicas.unwrap_or(1),
                max_replicas: config.max_replicas.unwrap_or(10),
                target_cpu: config.target_cpu.unwrap_or(70),
            },
            networking: NetworkingConfig {
                service_mesh: config.service_mesh.unwrap_or(false),
                load_balancer: config
                    .load_balancer
                    .clone()
                    .unwrap_or_else(|| "nginx".to_string()),
            },
            security: SecurityConfig {
                pod_security_context: config.security_context.clone(),
                network_policies: config.network_policies.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintMetadata {
    pub workbench_type: WorkbenchType,
    pub enterprise_customizations: bool,
    pub reproducible: bool,
    pub ai_optimized: bool,
}

/// Complete, hash-verified recipe for a workbench environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildBlueprint {
    pub name: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub environment: EnvironmentSpec,
    pub build_instructions: Vec<String>,
    pub test_suite: Vec<String>,
    pub benchmark_suite: Vec<String>,
    pub deployment_config: DeploymentConfig,
    pub metadata: BlueprintMetadata,
    /// `blueprint_spec`, `package_<name>` and `build_instructions` digests
    pub hash_manifest: BTreeMap<String, String>,
}

/// Outcome of the reproducibility checks on a blueprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproducibilityReport {
    pub has_version_pinning: bool,
    pub has_checksums: bool,
    pub has_hash_manifest: bool,
    pub build_deterministic: bool,
    pub dependencies_resolved: bool,
}

impl ReproducibilityReport {
    pub fn checks(&self) -> [(&'static str, bool); 5] {
        [
            ("has_version_pinning", self.has_version_pinning),
            ("has_checksums", self.has_checksums),
            ("has_hash_manifest", self.has_hash_manifest),
            ("build_deterministic", self.build_deterministic),
            ("dependencies_resolved", self.dependencies_resolved),
        ]
    }

    pub fn is_reproducible(&self) -> bool {
        self.checks().iter().all(|(_, passed)| *passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbench_type_parse() {
        assert_eq!(
            "nn_development".parse::<WorkbenchType>().unwrap(),
            WorkbenchType::NnDevelopment
        );
        assert!(matches!(
            "quantum_lab".parse::<WorkbenchType>(),
            Err(BlueprintError::UnknownWorkbenchType(t)) if t == "quantum_lab"
        ));
    }

    #[test]
    fn test_exposed_port_takes_container_side() {
        let service = ServiceSpec {
            name: "mcp_server".into(),
            command: "serve".into(),
            ports: vec!["18765:8765".into()],
            health_check: String::new(),
        };
        assert_eq!(service.exposed_port(), Some("8765"));
    }

    #[test]
    fn test_enterprise_config_customizations() {
        assert!(!EnterpriseConfig::default().has_customizations());
        let config: EnterpriseConfig = serde_yaml::from_str("gpu_support: true").unwrap();
        assert!(config.has_customizations());
        let deployment = DeploymentConfig::from(&config);
        assert_eq!(deployment.scaling.max_replicas, 10);
        assert_eq!(deployment.networking.load_balancer, "nginx");
    }
}
