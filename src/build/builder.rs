// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::build::manifest::{compute_verification_checksums, ManifestContent};
use crate::build::system::{architecture_key, benchmark_suites, model_key, protocol_key};
use crate::build::{
    validate_build_graph, ArchitectureSpec, BuildComponent, BuildConfig, BuildEnvironment,
    BuildGraph, BuildManifest, BuildProcedure, BuildSystem, ModelSpec, ProtocolSpec,
    SystemBlueprint, SystemSpecification,
};
use crate::errors::{BuildError, ValidationError};
use crate::observability::messages::build::{ComponentRegistered, ManifestGenerated};
use crate::observability::messages::StructuredLog;
use crate::utils::canonical_hash;

/// Dependency graph reachable from a set of targets
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGraph {
    pub graph: BuildGraph,
    /// Inputs no registered component provides, sorted
    pub external_inputs: Vec<String>,
}

/// Content-addressed registry of build components and the manifests built from it.
///
/// Components are keyed by `{name}-{version}-{hash8}`. Inputs and targets may
/// name a component by that key, by a registered alias, or by its plain name
/// (the most recently registered version wins).
#[derive(Debug)]
pub struct ReproducibleBuilder {
    store_path: PathBuf,
    registry: BTreeMap<String, BuildComponent>,
    aliases: BTreeMap<String, String>,
    latest_by_name: BTreeMap<String, String>,
}

impl ReproducibleBuilder {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            registry: BTreeMap::new(),
            aliases: BTreeMap::new(),
            latest_by_name: BTreeMap::new(),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn registry(&self) -> &BTreeMap<String, BuildComponent> {
        &self.registry
    }

    /// Define a component whose identity is the hash of its source specification.
    ///
    /// Redefining an identical component is a no-op. Reusing a key for a
    /// different procedure is rejected.
    pub fn define_build_component<S: Serialize + ?Sized>(
        &mut self,
        name: &str,
        version: &str,
        source_specification: &S,
        procedure: BuildProcedure,
    ) -> Result<BuildComponent, BuildError> {
        let source_hash = canonical_hash(source_specification)?;
        let component = BuildComponent::from_procedure(name, version, source_hash, procedure);
        let key = component.key();

        if let Some(existing) = self.registry.get(&key) {
            if existing != &component {
                return Err(ValidationError::DuplicateComponent { key }.into());
            }
            return Ok(component);
        }

        ComponentRegistered {
            key: &key,
            build_system: component.build_system.as_str(),
            input_count: component.build_inputs.len(),
        }
        .log();

        self.latest_by_name.insert(name.to_string(), key.clone());
        self.registry.insert(key, component.clone());
        Ok(component)
    }

    /// Make `alias` resolve to the component registered under `key`
    pub fn register_alias(&mut self, alias: impl Into<String>, key: impl Into<String>) {
        self.aliases.insert(alias.into(), key.into());
    }

    /// Map a key, alias or component name to a registry key
    pub fn resolve_identifier(&self, identifier: &str) -> Option<&str> {
        if let Some((key, _)) = self.registry.get_key_value(identifier) {
            return Some(key.as_str());
        }
        self.aliases
            .get(identifier)
            .or_else(|| self.latest_by_name.get(identifier))
            .filter(|key| self.registry.contains_key(*key))
            .map(String::as_str)
    }

    pub fn create_ml_model_component(
        &mut self,
        spec: &ModelSpec,
    ) -> Result<BuildComponent, BuildError> {
        let mut source = json!({
            "model_architecture": spec.architecture,
            "training_data": spec.training_data,
            "hyperparameters": spec.hyperparameters,
            "random_seeds": spec.random_seeds,
        });
        attach_depends_on(&mut source, &spec.depends_on);

        let name = &spec.name;
        let procedure = BuildProcedure {
            build_system: BuildSystem::PytorchTrainer,
            inputs: with_dependencies(
                &["python-pytorch", "python-transformers", "training-datasets"],
                &spec.depends_on,
            ),
            outputs: vec![
                format!("{}.pth", name),
                format!("{}_config.json", name),
                format!("{}_metrics.json", name),
            ],
            configuration: BTreeMap::from([
                ("training_script".to_string(), json!(spec.training_script)),
                ("evaluation_script".to_string(), json!(spec.evaluation_script)),
                ("validation_requirements".to_string(), json!(spec.validation)),
            ]),
            environment: string_map(&[
                ("CUDA_VISIBLE_DEVICES", "0"),
                ("PYTHONHASHSEED", "0"),
                ("TORCH_DETERMINISTIC", "1"),
            ]),
        };

        self.define_build_component(name, &spec.version, &source, procedure)
    }

    pub fn create_protocol_component(
        &mut self,
        spec: &ProtocolSpec,
    ) -> Result<BuildComponent, BuildError> {
        let mut source = json!({
            "protocol_definition": spec.definition,
            "interface_specification": spec.interfaces,
            "implementation_language": spec.language,
            "dependencies": spec.dependencies,
        });
        attach_depends_on(&mut source, &spec.depends_on);

        let name = &spec.name;
        let procedure = BuildProcedure {
            build_system: BuildSystem::ProtocolCompiler,
            inputs: with_dependencies(
                &["protocol-compiler", "code-generator", "validation-tools"],
                &spec.depends_on,
            ),
            outputs: vec![
                format!("{}_implementation.py", name),
                format!("{}_client.py", name),
                format!("{}_server.py", name),
                format!("{}_tests.py", name),
            ],
            configuration: BTreeMap::from([
                ("code_generation_templates".to_string(), json!(spec.templates)),
                ("validation_suite".to_string(), json!(spec.validation)),
                ("performance_requirements".to_string(), json!(spec.performance)),
            ]),
            environment: string_map(&[
                ("PROTOCOL_VERSION", spec.version.as_str()),
                ("VALIDATION_LEVEL", "strict"),
            ]),
        };

        self.define_build_component(name, &spec.version, &source, procedure)
    }

    pub fn create_cognitive_architecture_component(
        &mut self,
        spec: &ArchitectureSpec,
    ) -> Result<BuildComponent, BuildError> {
        let mut source = json!({
            "cognitive_modules": spec.modules,
            "neural_topology": spec.topology,
            "knowledge_bases": spec.knowledge_bases,
            "reasoning_engines": spec.reasoning_engines,
        });
        attach_depends_on(&mut source, &spec.depends_on);

        let name = &spec.name;
        let procedure = BuildProcedure {
            build_system: BuildSystem::CognitiveAssembler,
            inputs: with_dependencies(
                &[
                    "cognitive-framework",
                    "neural-network-components",
                    "knowledge-processing-tools",
                    "reasoning-engines",
                ],
                &spec.depends_on,
            ),
            outputs: vec![
                format!("{}_cognitive_system", name),
                format!("{}_knowledge_base", name),
                format!("{}_reasoning_engine", name),
                format!("{}_benchmarks", name),
            ],
            configuration: BTreeMap::from([
                ("assembly_strategy".to_string(), json!(spec.assembly)),
                ("optimization_level".to_string(), json!(spec.optimization)),
                ("validation_suite".to_string(), json!(spec.validation)),
            ]),
            environment: string_map(&[
                ("COGNITIVE_ARCH_VERSION", spec.version.as_str()),
                ("OPTIMIZATION_LEVEL", "3"),
                ("MEMORY_LIMIT", "16GB"),
            ]),
        };

        self.define_build_component(name, &spec.version, &source, procedure)
    }

    /// Walk the inputs of every target and return the reachable graph.
    ///
    /// Registered components become nodes keyed by their registry key. Inputs
    /// that resolve to nothing become leaf nodes and are reported as external.
    ///
    /// # Errors
    /// * `UnresolvedTarget` for every target that is not a registered component
    /// * `CyclicDependency` when registered components depend on each other in a loop
    pub fn resolve_dependency_graph(&self, targets: &[String]) -> Result<ResolvedGraph, BuildError> {
        let mut pending = Vec::with_capacity(targets.len());
        let mut errors = Vec::new();
        for target in targets {
            match self.resolve_identifier(target) {
                Some(key) => pending.push(key.to_string()),
                None => errors.push(ValidationError::UnresolvedTarget {
                    target: target.clone(),
                }),
            }
        }
        if !errors.is_empty() {
            return Err(BuildError::Validation(errors));
        }

        let mut graph = BuildGraph::new();
        let mut external = BTreeSet::new();

        while let Some(node) = pending.pop() {
            if graph.contains(&node) {
                continue;
            }
            match self.registry.get(&node) {
                Some(component) => {
                    let inputs: Vec<String> = component
                        .build_inputs
                        .iter()
                        .map(|input| {
                            self.resolve_identifier(input)
                                .map(str::to_string)
                                .unwrap_or_else(|| input.clone())
                        })
                        .collect();
                    pending.extend(inputs.iter().filter(|i| !graph.contains(i)).cloned());
                    graph.add_node(node, inputs);
                }
                None => {
                    external.insert(node.clone());
                    graph.add_node(node, Vec::new());
                }
            }
        }

        validate_build_graph(&graph).map_err(BuildError::Validation)?;

        Ok(ResolvedGraph {
            graph,
            external_inputs: external.into_iter().collect(),
        })
    }

    /// Produce a manifest whose id depends only on its content.
    pub fn generate_build_manifest(
        &self,
        target_components: &[String],
        build_config: &BuildConfig,
    ) -> Result<BuildManifest, BuildError> {
        let resolved = self.resolve_dependency_graph(target_components)?;
        let build_order = resolved.graph.topological_order()?;

        let components: Vec<BuildComponent> = build_order
            .iter()
            .filter_map(|key| self.registry.get(key))
            .cloned()
            .collect();

        let verification_checksums = compute_verification_checksums(&components)?;
        let build_environment = BuildEnvironment::from(build_config);

        let manifest_id = canonical_hash(&ManifestContent {
            target_components,
            build_config,
            components: &components,
            dependency_graph: &resolved.graph,
            build_environment: &build_environment,
        })?;

        let manifest = BuildManifest {
            manifest_id,
            target_name: build_config.target_name().to_string(),
            target_version: build_config.target_version().to_string(),
            build_timestamp: Utc::now(),
            components,
            dependency_graph: resolved.graph,
            build_environment,
            verification_checksums,
            external_inputs: resolved.external_inputs,
        };

        ManifestGenerated {
            manifest_id: &manifest.manifest_id,
            target_name: &manifest.target_name,
            component_count: manifest.components.len(),
            external_input_count: manifest.external_inputs.len(),
        }
        .log();

        Ok(manifest)
    }

    /// Register every component of a system and build one manifest per scenario.
    ///
    /// Scenarios without an explicit component list target every component of
    /// the system.
    pub fn create_ai_system_blueprint(
        &mut self,
        system_name: &str,
        specification: &SystemSpecification,
    ) -> Result<SystemBlueprint, BuildError> {
        let mut components = BTreeMap::new();

        for model in &specification.models {
            let component = self.create_ml_model_component(model)?;
            self.register_component_alias(&mut components, model_key(&model.name), component);
        }
        for protocol in &specification.protocols {
            let component = self.create_protocol_component(protocol)?;
            self.register_component_alias(
                &mut components,
                protocol_key(&protocol.name),
                component,
            );
        }
        for architecture in &specification.architectures {
            let component = self.create_cognitive_architecture_component(architecture)?;
            self.register_component_alias(
                &mut components,
                architecture_key(&architecture.name),
                component,
            );
        }

        let mut build_manifests = BTreeMap::new();
        for (scenario, config) in &specification.deployment_scenarios {
            let targets = config
                .components
                .clone()
                .unwrap_or_else(|| components.keys().cloned().collect());
            let manifest = self.generate_build_manifest(&targets, config)?;
            build_manifests.insert(scenario.clone(), manifest);
        }

        Ok(SystemBlueprint {
            system_name: system_name.to_string(),
            system_version: specification.version.clone(),
            components,
            build_manifests,
            benchmark_suites: benchmark_suites(),
        })
    }

    fn register_component_alias(
        &mut self,
        components: &mut BTreeMap<String, BuildComponent>,
        blueprint_key: String,
        component: BuildComponent,
    ) {
        self.register_alias(blueprint_key.clone(), component.key());
        components.insert(blueprint_key, component);
    }
}

fn with_dependencies(fixed: &[&str], depends_on: &[String]) -> Vec<String> {
    fixed
        .iter()
        .map(|s| s.to_string())
        .chain(depends_on.iter().cloned())
        .collect()
}

fn attach_depends_on(source: &mut Value, depends_on: &[String]) {
    if depends_on.is_empty() {
        return;
    }
    if let Some(map) = source.as_object_mut() {
        map.insert("depends_on".to_string(), json!(depends_on));
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, learning_rate: f64) -> ModelSpec {
        serde_json::from_value(json!({
            "name": name,
            "architecture": "transformer",
            "training_data": "corpus",
            "hyperparameters": {"layers": 12, "learning_rate": learning_rate},
        }))
        .unwrap()
    }

    fn protocol(name: &str) -> ProtocolSpec {
        serde_json::from_value(json!({
            "name": name,
            "definition": "mcp_extension",
            "interfaces": ["neural_transport"],
            "dependencies": ["websockets"],
        }))
        .unwrap()
    }

    #[test]
    fn test_define_is_idempotent_and_keyed_by_hash() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let spec = json!({"src": "a"});
        let first = builder
            .define_build_component("lib", "1.0.0", &spec, BuildProcedure::default())
            .unwrap();
        let second = builder
            .define_build_component("lib", "1.0.0", &spec, BuildProcedure::default())
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(builder.registry().len(), 1);
        assert!(first.key().starts_with("lib-1.0.0-"));
        assert_eq!(first.key().len(), "lib-1.0.0-".len() + 8);
    }

    #[test]
    fn test_conflicting_definition_rejected() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let spec = json!({"src": "a"});
        builder
            .define_build_component("lib", "1.0.0", &spec, BuildProcedure::default())
            .unwrap();
        let other = BuildProcedure {
            outputs: vec!["different".into()],
            ..BuildProcedure::default()
        };
        let err = builder
            .define_build_component("lib", "1.0.0", &spec, other)
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate component key"));
    }

    #[test]
    fn test_manifest_orders_inputs_first_and_lists_externals() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        builder.create_ml_model_component(&model("encoder", 1e-4)).unwrap();
        let mut head = model("head", 1e-4);
        head.depends_on = vec!["encoder".into()];
        let head_component = builder.create_ml_model_component(&head).unwrap();

        let manifest = builder
            .generate_build_manifest(&[head_component.key()], &BuildConfig::default())
            .unwrap();

        let names: Vec<&str> = manifest.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["encoder", "head"]);
        assert_eq!(
            manifest.external_inputs,
            vec!["python-pytorch", "python-transformers", "training-datasets"]
        );
        assert_eq!(manifest.verification_checksums.len(), 2);
        assert_eq!(manifest.target_name, "ai_system");
    }

    #[test]
    fn test_manifest_id_is_deterministic() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let component = builder.create_ml_model_component(&model("m", 2e-5)).unwrap();
        let targets = vec![component.key()];

        let a = builder
            .generate_build_manifest(&targets, &BuildConfig::default())
            .unwrap();
        let b = builder
            .generate_build_manifest(&targets, &BuildConfig::default())
            .unwrap();
        assert_eq!(a.manifest_id, b.manifest_id);
        assert_eq!(a.manifest_id.len(), 64);
    }

    #[test]
    fn test_hyperparameter_change_changes_manifest_id() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let slow = builder.create_ml_model_component(&model("m", 2e-5)).unwrap();
        let fast = builder.create_ml_model_component(&model("m", 1e-3)).unwrap();
        assert_ne!(slow.source_hash, fast.source_hash);

        let config = BuildConfig::default();
        let a = builder.generate_build_manifest(&[slow.key()], &config).unwrap();
        let b = builder.generate_build_manifest(&[fast.key()], &config).unwrap();
        assert_ne!(a.manifest_id, b.manifest_id);
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let builder = ReproducibleBuilder::new("/nix/store");
        let err = builder
            .generate_build_manifest(&["ghost".to_string()], &BuildConfig::default())
            .unwrap_err();
        match err {
            BuildError::Validation(errors) => assert_eq!(
                errors,
                vec![ValidationError::UnresolvedTarget {
                    target: "ghost".into()
                }]
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_cycle_between_components_is_reported() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let a_procedure = BuildProcedure {
            inputs: vec!["b".into()],
            ..BuildProcedure::default()
        };
        let b_procedure = BuildProcedure {
            inputs: vec!["a".into()],
            ..BuildProcedure::default()
        };
        builder
            .define_build_component("a", "1", &json!({"a": 1}), a_procedure)
            .unwrap();
        builder
            .define_build_component("b", "1", &json!({"b": 1}), b_procedure)
            .unwrap();

        let err = builder
            .generate_build_manifest(&["a".to_string()], &BuildConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Cyclic dependency detected"));
    }

    #[test]
    fn test_system_blueprint_resolves_blueprint_keys() {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let spec = SystemSpecification {
            version: "2.0.0".into(),
            models: vec![model("lm", 2e-5)],
            protocols: vec![protocol("collab")],
            architectures: vec![],
            deployment_scenarios: BTreeMap::from([
                (
                    "dev".to_string(),
                    BuildConfig {
                        components: Some(vec!["model_lm".into()]),
                        target_name: Some("dev_system".into()),
                        ..BuildConfig::default()
                    },
                ),
                ("all".to_string(), BuildConfig::default()),
            ]),
        };

        let blueprint = builder.create_ai_system_blueprint("Demo", &spec).unwrap();
        assert_eq!(blueprint.system_version, "2.0.0");
        assert!(blueprint.components.contains_key("model_lm"));
        assert!(blueprint.components.contains_key("protocol_collab"));
        assert_eq!(blueprint.build_manifests["dev"].components.len(), 1);
        assert_eq!(blueprint.build_manifests["dev"].target_name, "dev_system");
        assert_eq!(blueprint.build_manifests["all"].components.len(), 2);
        assert_eq!(blueprint.benchmark_suites.len(), 3);
    }
}
