// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::blueprint::environments::environment_for;
use crate::blueprint::{
    BlueprintMetadata, BuildBlueprint, DeploymentConfig, EnterpriseConfig, EnvironmentSpec,
    ExportFormat, ReproducibilityReport, WorkbenchType,
};
use crate::build::BuildGraph;
use crate::errors::BlueprintError;
use crate::utils::{canonical_hash, sha256_hex};

const BASE_PACKAGES: &str = "RUN apt-get update && apt-get install -y curl wget git build-essential";

/// The part of a blueprint covered by the `blueprint_spec` digest.
///
/// `created_at` and the hash manifest itself are left out, so regenerating the
/// same workbench yields the same digests.
#[derive(Serialize)]
struct BlueprintContent<'a> {
    name: &'a str,
    version: &'a str,
    environment: &'a EnvironmentSpec,
    build_instructions: &'a [String],
    test_suite: &'a [String],
    benchmark_suite: &'a [String],
    deployment_config: &'a DeploymentConfig,
    metadata: &'a BlueprintMetadata,
}

/// Produces versioned workbench blueprints and keeps their history.
#[derive(Debug, Default)]
pub struct BlueprintGenerator {
    history: Vec<BuildBlueprint>,
}

impl BlueprintGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[BuildBlueprint] {
        &self.history
    }

    pub fn create_ai_workbench_blueprint(
        &mut self,
        workbench_type: WorkbenchType,
        config: &EnterpriseConfig,
    ) -> Result<BuildBlueprint, BlueprintError> {
        let environment = environment_for(workbench_type, config);

        let mut blueprint = BuildBlueprint {
            name: format!("{}_blueprint", workbench_type),
            version: format!("1.{}", self.history.len()),
            created_at: Utc::now(),
            build_instructions: build_instructions(&environment),
            environment,
            test_suite: test_suite(workbench_type),
            benchmark_suite: benchmark_suite(workbench_type),
            deployment_config: DeploymentConfig::from(config),
            metadata: BlueprintMetadata {
                workbench_type,
                enterprise_customizations: config.has_customizations(),
                reproducible: true,
                ai_optimized: true,
            },
            hash_manifest: BTreeMap::new(),
        };
        blueprint.hash_manifest = hash_manifest(&blueprint)?;

        tracing::info!(
            blueprint = %blueprint.name,
            version = %blueprint.version,
            packages = blueprint.environment.packages.len(),
            "Generated workbench blueprint"
        );

        self.history.push(blueprint.clone());
        Ok(blueprint)
    }
}

/// Dockerfile-style steps that assemble the environment
pub fn build_instructions(environment: &EnvironmentSpec) -> Vec<String> {
    let mut lines = vec![
        format!("# Build instructions for {}", environment.name),
        format!("FROM {}", environment.base_system),
        String::new(),
        "# Set up base system".to_string(),
        BASE_PACKAGES.to_string(),
        String::new(),
    ];

    for package in &environment.packages {
        let install = match package.build_system.as_str() {
            "python" => Some(format!("RUN pip install {}=={}", package.name, package.version)),
            "nodejs" => Some(format!(
                "RUN npm install -g {}@{}",
                package.name, package.version
            )),
            "cargo" => Some(format!(
                "RUN cargo install {} --version {}",
                package.name, package.version
            )),
            _ => None,
        };
        match install {
            Some(install) => {
                lines.push(format!("# Install {} v{}", package.name, package.version));
                lines.push(install);
            }
            None => lines.push(format!(
                "# {} v{} ({} build) is provided by the base system",
                package.name, package.version, package.build_system
            )),
        }
        lines.push(String::new());
    }

    if !environment.environment_vars.is_empty() {
        lines.push("# Set environment variables".to_string());
        for (key, value) in &environment.environment_vars {
            lines.push(format!("ENV {}={}", key, value));
        }
        lines.push(String::new());
    }

    if !environment.services.is_empty() {
        lines.push("# Set up services".to_string());
        for service in &environment.services {
            lines.push(format!("# Service: {}", service.name));
            if let Some(port) = service.exposed_port() {
                lines.push(format!("EXPOSE {}", port));
            }
        }
        lines.push(String::new());
    }

    lines
}

fn test_suite(workbench_type: WorkbenchType) -> Vec<String> {
    let mut tests = vec![
        "# Basic environment tests",
        "python --version",
        "pip list",
        "python -c 'import sys; print(sys.path)'",
    ];
    if workbench_type.includes_ml() {
        tests.extend([
            "# ML framework tests",
            "python -c 'import torch; print(f\"PyTorch: {torch.__version__}\")'",
            "python -c 'import torch; x = torch.randn(10, 10); print(f\"Tensor ops work: {x.sum()}\")'",
        ]);
    }
    match workbench_type {
        WorkbenchType::MlResearch | WorkbenchType::HybridWorkbench => tests.push(
            "python -c 'import transformers; print(f\"Transformers: {transformers.__version__}\")'",
        ),
        WorkbenchType::NnDevelopment => tests.push(
            "python -c 'import onnx, torchvision; print(\"ONNX and torchvision import\")'",
        ),
        WorkbenchType::ProtocolDesign => {}
    }
    if workbench_type.includes_protocols() {
        tests.extend([
            "# Protocol framework tests",
            "node --version",
            "npm list -g typescript",
            "node -e 'console.log(\"Node.js runtime works\")'",
        ]);
    }
    tests.into_iter().map(String::from).collect()
}

fn benchmark_suite(workbench_type: WorkbenchType) -> Vec<String> {
    let mut benchmarks = vec![
        "# Performance benchmarks",
        "time python -c 'import torch; torch.randn(1000, 1000).sum()'",
    ];
    if workbench_type.includes_ml() {
        benchmarks.extend([
            "# ML performance benchmarks",
            "python -c 'import torch; import time; start=time.time(); x=torch.randn(5000,5000); y=torch.matmul(x,x); print(f\"Matrix multiply time: {time.time()-start:.3f}s\")'",
            "python -c 'from transformers import AutoTokenizer; tokenizer = AutoTokenizer.from_pretrained(\"bert-base-uncased\"); print(f\"Tokenizer load time measured\")'",
        ]);
    }
    if workbench_type.includes_protocols() {
        benchmarks.extend([
            "# Protocol performance benchmarks",
            "node -e 'console.time(\"startup\"); require(\"ws\"); console.timeEnd(\"startup\")'",
        ]);
    }
    benchmarks.into_iter().map(String::from).collect()
}

/// Digests of the blueprint content, every package and the joined build instructions
pub fn hash_manifest(blueprint: &BuildBlueprint) -> Result<BTreeMap<String, String>, BlueprintError> {
    let mut manifest = BTreeMap::new();

    let content = BlueprintContent {
        name: &blueprint.name,
        version: &blueprint.version,
        environment: &blueprint.environment,
        build_instructions: &blueprint.build_instructions,
        test_suite: &blueprint.test_suite,
        benchmark_suite: &blueprint.benchmark_suite,
        deployment_config: &blueprint.deployment_config,
        metadata: &blueprint.metadata,
    };
    manifest.insert("blueprint_spec".to_string(), canonical_hash(&content)?);

    for package in &blueprint.environment.packages {
        manifest.insert(format!("package_{}", package.name), canonical_hash(package)?);
    }

    manifest.insert(
        "build_instructions".to_string(),
        sha256_hex(blueprint.build_instructions.join("\n")),
    );
    Ok(manifest)
}

pub fn export_blueprint(
    blueprint: &BuildBlueprint,
    format: ExportFormat,
) -> Result<String, BlueprintError> {
    match format {
        ExportFormat::Yaml => Ok(serde_yaml::to_string(blueprint)?),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(blueprint)?),
    }
}

pub fn validate_reproducibility(blueprint: &BuildBlueprint) -> ReproducibilityReport {
    let packages = &blueprint.environment.packages;

    let build_deterministic = match hash_manifest(blueprint) {
        Ok(recomputed) => recomputed == blueprint.hash_manifest,
        Err(_) => false,
    };

    let package_graph: BuildGraph = packages
        .iter()
        .map(|p| (p.name.clone(), p.dependencies.clone()))
        .collect::<BTreeMap<_, _>>()
        .into();

    ReproducibilityReport {
        has_version_pinning: packages.iter().all(|p| p.is_pinned()),
        has_checksums: packages.iter().all(|p| p.checksum.is_some()),
        has_hash_manifest: !blueprint.hash_manifest.is_empty(),
        build_deterministic,
        dependencies_resolved: package_graph.levels().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::PackageSpec;

    fn hybrid() -> BuildBlueprint {
        BlueprintGenerator::new()
            .create_ai_workbench_blueprint(
                WorkbenchType::HybridWorkbench,
                &EnterpriseConfig::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_version_tracks_history() {
        let mut generator = BlueprintGenerator::new();
        let config = EnterpriseConfig::default();
        for (n, workbench) in WorkbenchType::ALL.into_iter().enumerate() {
            let blueprint = generator
                .create_ai_workbench_blueprint(workbench, &config)
                .unwrap();
            assert_eq!(blueprint.version, format!("1.{}", n));
        }
        assert_eq!(generator.history().len(), 4);
    }

    #[test]
    fn test_hash_manifest_is_stable() {
        let first = hybrid();
        let second = hybrid();
        assert_eq!(first.hash_manifest, second.hash_manifest);
        // blueprint_spec + build_instructions + one per package
        assert_eq!(first.hash_manifest.len(), 2 + first.environment.packages.len());
        assert!(first.hash_manifest.contains_key("package_mcp-sdk"));
    }

    #[test]
    fn test_build_instructions_per_build_system() {
        let blueprint = hybrid();
        let lines = &blueprint.build_instructions;
        assert_eq!(lines[1], "FROM ubuntu:24.04");
        assert!(lines.contains(&"RUN pip install pytorch==2.1.0".to_string()));
        assert!(lines.contains(&"RUN npm install -g typescript@5.3.0".to_string()));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("# antlr4 v4.13.1 (java build)")));
        assert!(lines.contains(&"ENV NODE_ENV=development".to_string()));
        assert!(lines.contains(&"EXPOSE 8766".to_string()));
    }

    #[test]
    fn test_cargo_packages_use_cargo_install() {
        let mut environment =
            environment_for(WorkbenchType::ProtocolDesign, &EnterpriseConfig::default());
        environment.packages = vec![PackageSpec::new(
            "ripgrep",
            "14.1.0",
            "https://github.com/BurntSushi/ripgrep",
            "cargo",
            &[],
        )];
        let lines = build_instructions(&environment);
        assert!(lines.contains(&"RUN cargo install ripgrep --version 14.1.0".to_string()));
    }

    #[test]
    fn test_reproducibility_checks() {
        let mut blueprint = hybrid();
        let report = validate_reproducibility(&blueprint);
        assert!(report.has_version_pinning);
        assert!(!report.has_checksums);
        assert!(report.has_hash_manifest);
        assert!(report.build_deterministic);
        assert!(report.dependencies_resolved);
        assert!(!report.is_reproducible());

        blueprint.environment.packages[0].version = "latest".into();
        let report = validate_reproducibility(&blueprint);
        assert!(!report.has_version_pinning);
        assert!(!report.build_deterministic);
    }

    #[test]
    fn test_cyclic_package_dependencies_are_unresolved() {
        let mut blueprint = hybrid();
        let packages = &mut blueprint.environment.packages;
        packages[0].dependencies = vec!["jupyter".into()];
        packages[3].dependencies = vec!["pytorch".into()];
        assert!(!validate_reproducibility(&blueprint).dependencies_resolved);
    }

    #[test]
    fn test_exports_parse_back() {
        let blueprint = hybrid();

        let yaml = export_blueprint(&blueprint, ExportFormat::Yaml).unwrap();
        let from_yaml: BuildBlueprint = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(from_yaml.hash_manifest, blueprint.hash_manifest);

        let json = export_blueprint(&blueprint, ExportFormat::Json).unwrap();
        let from_json: BuildBlueprint = serde_json::from_str(&json).unwrap();
        assert_eq!(from_json.environment, blueprint.environment);
    }
}
