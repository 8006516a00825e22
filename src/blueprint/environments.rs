// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Environment templates for each workbench type.

use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::blueprint::{EnterpriseConfig, EnvironmentSpec, PackageSpec, ServiceSpec, WorkbenchType};

pub fn environment_for(workbench_type: WorkbenchType, config: &EnterpriseConfig) -> EnvironmentSpec {
    match workbench_type {
        WorkbenchType::MlResearch => ml_research(config),
        WorkbenchType::NnDevelopment => nn_development(config),
        WorkbenchType::ProtocolDesign => protocol_design(config),
        WorkbenchType::HybridWorkbench => hybrid(config),
    }
}

fn version_or(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

fn with_overrides(
    base: &[(&str, &str)],
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut vars: BTreeMap<String, String> = base
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    vars
}

fn flags(entries: &[(&str, bool)]) -> BTreeMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Value::Bool(*v)))
        .collect()
}

fn ml_research(config: &EnterpriseConfig) -> EnvironmentSpec {
    let mut pytorch = PackageSpec::new(
        "pytorch",
        &version_or(&config.pytorch_version, "2.1.0"),
        "https://download.pytorch.org/whl/cpu",
        "python",
        &["numpy", "pillow"],
    );
    pytorch.build_args.insert(
        "index_url".into(),
        json!("https://download.pytorch.org/whl/cpu"),
    );

    let mut packages = vec![
        pytorch,
        PackageSpec::new(
            "transformers",
            &version_or(&config.transformers_version, "4.35.0"),
            "https://github.com/huggingface/transformers",
            "python",
            &["torch", "tokenizers", "safetensors"],
        ),
        PackageSpec::new(
            "datasets",
            &version_or(&config.datasets_version, "2.14.0"),
            "https://github.com/huggingface/datasets",
            "python",
            &["pandas", "pyarrow", "fsspec"],
        ),
        PackageSpec::new(
            "jupyter",
            "1.0.0",
            "https://github.com/jupyter/jupyter",
            "python",
            &["notebook", "ipykernel", "ipywidgets"],
        ),
    ];
    packages.extend(config.enterprise_ml_packages.iter().cloned());

    EnvironmentSpec {
        name: "ml_research_environment".into(),
        description: "Optimized environment for ML research and experimentation".into(),
        base_system: version_or(&config.base_system, "python:3.11-slim"),
        packages,
        environment_vars: with_overrides(
            &[
                ("PYTORCH_CUDA_ALLOC_CONF", "max_split_size_mb:512"),
                ("TRANSFORMERS_CACHE", "/workspace/cache/transformers"),
                ("HF_DATASETS_CACHE", "/workspace/cache/datasets"),
            ],
            &config.environment_vars,
        ),
        services: Vec::new(),
        volumes: Vec::new(),
        network_config: Default::default(),
        ai_specific: flags(&[
            ("gpu_support", config.gpu_support.unwrap_or(false)),
            ("distributed_training", config.distributed_training.unwrap_or(false)),
            ("model_parallelism", config.model_parallelism.unwrap_or(false)),
            ("memory_optimization", config.memory_optimization.unwrap_or(true)),
        ]),
    }
}

fn nn_development(config: &EnterpriseConfig) -> EnvironmentSpec {
    let mut packages = vec![
        PackageSpec::new(
            "pytorch",
            &version_or(&config.pytorch_version, "2.1.0"),
            "https://download.pytorch.org/whl/cpu",
            "python",
            &["numpy"],
        ),
        PackageSpec::new(
            "torchvision",
            &version_or(&config.torchvision_version, "0.16.0"),
            "https://github.com/pytorch/vision",
            "python",
            &["pytorch", "pillow"],
        ),
        PackageSpec::new(
            "tensorboard",
            "2.15.1",
            "https://github.com/tensorflow/tensorboard",
            "python",
            &["protobuf", "grpcio"],
        ),
        PackageSpec::new(
            "onnx",
            "1.15.0",
            "https://github.com/onnx/onnx",
            "python",
            &["protobuf", "numpy"],
        ),
    ];
    packages.extend(config.enterprise_ml_packages.iter().cloned());

    EnvironmentSpec {
        name: "nn_development_environment".into(),
        description: "Environment for neural network architecture development and export".into(),
        base_system: version_or(&config.base_system, "python:3.11-slim"),
        packages,
        environment_vars: with_overrides(
            &[
                ("PYTORCH_CUDA_ALLOC_CONF", "max_split_size_mb:512"),
                ("TENSORBOARD_LOGDIR", "/workspace/runs"),
            ],
            &config.environment_vars,
        ),
        services: vec![ServiceSpec {
            name: "tensorboard".into(),
            command: "tensorboard --logdir /workspace/runs --bind_all".into(),
            ports: vec!["6006:6006".into()],
            health_check: "http://localhost:6006".into(),
        }],
        volumes: vec!["/workspace/runs".into()],
        network_config: Default::default(),
        ai_specific: flags(&[
            ("gpu_support", config.gpu_support.unwrap_or(false)),
            ("model_parallelism", config.model_parallelism.unwrap_or(false)),
            ("memory_optimization", config.memory_optimization.unwrap_or(true)),
            ("onnx_export", true),
        ]),
    }
}

fn protocol_design(config: &EnterpriseConfig) -> EnvironmentSpec {
    let packages = vec![
        PackageSpec::new(
            "nodejs",
            &version_or(&config.node_version, "20.0.0"),
            "https://nodejs.org/dist/",
            "make",
            &[],
        ),
        PackageSpec::new(
            "typescript",
            "5.3.0",
            "https://registry.npmjs.org/typescript",
            "nodejs",
            &["nodejs"],
        ),
        PackageSpec::new(
            "mcp-sdk",
            &version_or(&config.mcp_version, "1.0.0"),
            "https://github.com/microsoft/mcp-sdk",
            "nodejs",
            &["typescript", "websockets"],
        ),
        PackageSpec::new(
            "vscode-languageserver",
            "9.0.1",
            "https://github.com/microsoft/vscode-languageserver-node",
            "nodejs",
            &["typescript"],
        ),
        PackageSpec::new(
            "antlr4",
            "4.13.1",
            "https://github.com/antlr/antlr4",
            "java",
            &["openjdk-11"],
        ),
    ];

    EnvironmentSpec {
        name: "protocol_design_environment".into(),
        description: "Environment for MCP/LSP protocol design and implementation".into(),
        base_system: version_or(&config.base_system, "node:20-slim"),
        packages,
        environment_vars: with_overrides(
            &[
                ("NODE_ENV", "development"),
                ("MCP_SERVER_PORT", "8765"),
                ("LSP_SERVER_PORT", "8766"),
            ],
            &config.environment_vars,
        ),
        services: vec![
            ServiceSpec {
                name: "mcp_server".into(),
                command: "node protocols/mcp/server.js".into(),
                ports: vec!["8765:8765".into()],
                health_check: "ws://localhost:8765/health".into(),
            },
            ServiceSpec {
                name: "lsp_server".into(),
                command: "node protocols/lsp/server.js".into(),
                ports: vec!["8766:8766".into()],
                health_check: "tcp://localhost:8766".into(),
            },
        ],
        volumes: Vec::new(),
        network_config: Default::default(),
        ai_specific: flags(&[
            ("protocol_introspection", true),
            ("real_time_optimization", true),
            ("natural_language_interface", true),
            (
                "enterprise_integration",
                config.enterprise_integration.unwrap_or(true),
            ),
        ]),
    }
}

/// ML research and protocol design in one environment; protocol settings win on conflicts
fn hybrid(config: &EnterpriseConfig) -> EnvironmentSpec {
    let ml = ml_research(config);
    let protocol = protocol_design(config);

    let mut packages = ml.packages;
    packages.extend(protocol.packages);

    let mut environment_vars = ml.environment_vars;
    environment_vars.extend(protocol.environment_vars);

    let mut ai_specific = ml.ai_specific;
    ai_specific.extend(protocol.ai_specific);

    EnvironmentSpec {
        name: "hybrid_workbench_environment".into(),
        description: "Complete AI workbench with ML and protocol capabilities".into(),
        base_system: version_or(&config.base_system, "ubuntu:24.04"),
        packages,
        environment_vars,
        services: protocol.services,
        volumes: Vec::new(),
        network_config: Default::default(),
        ai_specific,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_merges_both_templates() {
        let env = environment_for(WorkbenchType::HybridWorkbench, &EnterpriseConfig::default());
        assert_eq!(env.packages.len(), 9);
        assert_eq!(env.base_system, "ubuntu:24.04");
        assert_eq!(env.services.len(), 2);
        assert!(env.environment_vars.contains_key("HF_DATASETS_CACHE"));
        assert!(env.environment_vars.contains_key("MCP_SERVER_PORT"));
        assert_eq!(env.ai_specific["gpu_support"], Value::Bool(false));
    }

    #[test]
    fn test_enterprise_overrides_apply() {
        let mut config = EnterpriseConfig {
            pytorch_version: Some("2.2.0".into()),
            base_system: Some("ubuntu:24.04".into()),
            ..EnterpriseConfig::default()
        };
        config
            .environment_vars
            .insert("TRANSFORMERS_CACHE".into(), "/mnt/cache".into());
        config.enterprise_ml_packages.push(PackageSpec::new(
            "internal-tokenizer",
            "0.3.1",
            "git+ssh://git.example.com/tokenizer",
            "python",
            &[],
        ));

        let env = environment_for(WorkbenchType::MlResearch, &config);
        assert_eq!(env.packages[0].version, "2.2.0");
        assert_eq!(env.packages.len(), 5);
        assert_eq!(env.base_system, "ubuntu:24.04");
        assert_eq!(env.environment_vars["TRANSFORMERS_CACHE"], "/mnt/cache");
    }
}
