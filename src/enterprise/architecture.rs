// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::enterprise::namespace::{endpoints, strings};
use crate::enterprise::{EnterpriseNamespace, NamespaceType, RepoGroup, RouteEntry};
use crate::errors::EnterpriseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralTopology {
    pub routing_table_size: usize,
    pub transport_hubs: Vec<String>,
    pub total_endpoints: usize,
}

/// Snapshot of the whole enterprise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseManifest {
    pub enterprise_name: String,
    pub architecture_type: String,
    pub total_namespaces: usize,
    pub cognitive_cities: Vec<String>,
    pub active_workbenches: Vec<String>,
    pub neural_topology: NeuralTopology,
    /// Specialization domain -> orgs offering it
    pub specialization_matrix: BTreeMap<String, Vec<String>>,
    /// Org -> orgs it can collaborate with
    pub collaboration_graph: BTreeMap<String, Vec<String>>,
    pub namespaces: BTreeMap<String, EnterpriseNamespace>,
}

/// Organizations of an enterprise and the routes between them.
///
/// Org names are derived from the enterprise name, so creating the same city,
/// workbench or hub twice is rejected with [`EnterpriseError::NamespaceExists`].
#[derive(Debug)]
pub struct CognitiveEnterprise {
    enterprise_name: String,
    namespaces: BTreeMap<String, EnterpriseNamespace>,
    routing_table: BTreeMap<String, RouteEntry>,
    /// Project name -> workbench org name, in creation order
    workbenches: Vec<(String, String)>,
}

impl CognitiveEnterprise {
    pub fn new(enterprise_name: impl Into<String>) -> Self {
        Self {
            enterprise_name: enterprise_name.into(),
            namespaces: BTreeMap::new(),
            routing_table: BTreeMap::new(),
            workbenches: Vec::new(),
        }
    }

    pub fn enterprise_name(&self) -> &str {
        &self.enterprise_name
    }

    pub fn namespace(&self, org_name: &str) -> Option<&EnterpriseNamespace> {
        self.namespaces.get(org_name)
    }

    pub fn route(&self, org_name: &str) -> Option<&RouteEntry> {
        self.routing_table.get(org_name)
    }

    fn ensure_vacant(&self, org_name: &str) -> Result<(), EnterpriseError> {
        if self.namespaces.contains_key(org_name) {
            return Err(EnterpriseError::NamespaceExists(org_name.to_string()));
        }
        Ok(())
    }

    fn register(&mut self, namespace: EnterpriseNamespace) -> EnterpriseNamespace {
        let route = RouteEntry::from(&namespace);
        tracing::debug!(
            org_name = %namespace.org_name,
            namespace_type = namespace.namespace_type.as_str(),
            routing_priority = route.routing_priority,
            "Registered enterprise namespace"
        );
        self.routing_table.insert(namespace.org_name.clone(), route);
        self.namespaces
            .insert(namespace.org_name.clone(), namespace.clone());
        namespace
    }

    /// Home organization of one AI model, with a center per specialization
    pub fn create_cognitive_city_namespace(
        &mut self,
        model_name: &str,
        specializations: &[&str],
    ) -> Result<EnterpriseNamespace, EnterpriseError> {
        let org_name = format!(
            "{}-{}-cognitive-city",
            self.enterprise_name,
            model_name.to_lowercase()
        );
        self.ensure_vacant(&org_name)?;

        let mut centers = RepoGroup::new("Specialized capability centers", Vec::new());
        for spec in specializations {
            centers.groups.insert(
                spec.to_string(),
                RepoGroup::prefixed(
                    format!("Specialized capabilities in {}", spec),
                    &format!("{}-{}", model_name, spec),
                    &["core", "extensions", "benchmarks"],
                ),
            );
        }

        let mut departments = RepoGroup::new("Organizational departments", Vec::new());
        departments.groups.insert(
            "research-lab".into(),
            RepoGroup::prefixed(
                "Core research and innovation",
                model_name,
                &["research-foundations", "experimental-prototypes", "innovation-sandbox"],
            ),
        );
        departments.groups.insert(
            "engineering-workshop".into(),
            RepoGroup::prefixed(
                "Engineering and implementation",
                model_name,
                &["tool-forge", "architecture-blueprints", "integration-patterns"],
            ),
        );
        departments.groups.insert(
            "collaboration-hub".into(),
            RepoGroup::prefixed(
                "Inter-model collaboration",
                model_name,
                &["protocol-adapters", "communication-interfaces", "shared-knowledge-base"],
            ),
        );
        departments
            .groups
            .insert("specialization-centers".into(), centers);

        let mut structure = BTreeMap::new();
        structure.insert("departments".to_string(), departments);
        structure.insert(
            "neural-transport".to_string(),
            RepoGroup::prefixed(
                "Neural pathway infrastructure",
                model_name,
                &["neural-routing", "bandwidth-management", "quality-assurance"],
            ),
        );
        structure.insert(
            "governance".to_string(),
            RepoGroup::prefixed(
                "Self-governance and evolution",
                model_name,
                &["evolution-engine", "consensus-protocols", "performance-metrics"],
            ),
        );

        let namespace = EnterpriseNamespace {
            neural_endpoints: endpoints(
                &org_name,
                &[
                    ("primary_interface", "interface/primary"),
                    ("research_channel", "research/broadcast"),
                    ("collaboration_port", "collab/bidirectional"),
                    ("specialization_gateway", "specialist/gateway"),
                ],
            ),
            org_name,
            namespace_type: NamespaceType::CognitiveCity,
            owner_model: model_name.to_string(),
            specialization_domains: strings(specializations),
            repository_structure: structure,
            collaboration_interfaces: strings(&["neural_transport", "semantic_api", "knowledge_graph"]),
            model_channels: BTreeMap::new(),
        };
        Ok(self.register(namespace))
    }

    /// Shared space where several models work on one project
    pub fn create_workbench_namespace(
        &mut self,
        project_name: &str,
        participating_models: &[&str],
    ) -> Result<EnterpriseNamespace, EnterpriseError> {
        let org_name = format!(
            "{}-workbench-{}",
            self.enterprise_name,
            project_name.to_lowercase()
        );
        self.ensure_vacant(&org_name)?;

        let mut structure = BTreeMap::new();
        for (group, description, suffixes) in [
            (
                "planning-space",
                "Collaborative planning and design",
                ["vision-board", "architecture-sketches", "requirement-synthesis"],
            ),
            (
                "prototyping-lab",
                "Rapid prototyping and experimentation",
                ["proof-of-concepts", "interactive-demos", "feasibility-studies"],
            ),
            (
                "toolchain-forge",
                "Tool and protocol development",
                ["custom-tools", "protocol-implementations", "integration-scripts"],
            ),
            (
                "collaboration-space",
                "Multi-model collaboration area",
                ["shared-workspace", "decision-logs", "knowledge-fusion"],
            ),
            (
                "build-pipeline",
                "Reproducible build system",
                ["build-blueprints", "guix-manifests", "benchmark-suite"],
            ),
        ] {
            structure.insert(
                group.to_string(),
                RepoGroup::prefixed(description, project_name, &suffixes),
            );
        }

        let mut model_channels = BTreeMap::new();
        for model in participating_models {
            let lower = model.to_lowercase();
            structure.insert(
                format!("{}-contributions", lower),
                RepoGroup::prefixed(
                    format!("Contributions from {}", model),
                    &format!("{}-{}", project_name, lower),
                    &["insights", "implementations", "evaluations"],
                ),
            );
            model_channels.insert(
                model.to_string(),
                format!("neural://{}/models/{}/channel", org_name, lower),
            );
        }

        let namespace = EnterpriseNamespace {
            neural_endpoints: endpoints(
                &org_name,
                &[
                    ("workbench_hub", "hub/central"),
                    ("synthesis_engine", "synthesis/engine"),
                    ("build_orchestrator", "build/orchestrator"),
                ],
            ),
            org_name: org_name.clone(),
            namespace_type: NamespaceType::Workbench,
            owner_model: "collaborative".into(),
            specialization_domains: strings(&[
                "multi_model_collaboration",
                "rapid_prototyping",
                "build_automation",
            ]),
            repository_structure: structure,
            collaboration_interfaces: strings(&[
                "multi_model_neural",
                "consensus_protocols",
                "build_pipelines",
            ]),
            model_channels,
        };
        self.workbenches.push((project_name.to_string(), org_name));
        Ok(self.register(namespace))
    }

    /// Department inside an owning model's city, e.g. an ML department
    pub fn create_department_namespace(
        &mut self,
        department: &str,
        owner_model: &str,
        specializations: &[&str],
    ) -> Result<EnterpriseNamespace, EnterpriseError> {
        let org_name = format!(
            "{}-{}-{}-dept",
            self.enterprise_name,
            owner_model.to_lowercase(),
            department.to_lowercase()
        );
        self.ensure_vacant(&org_name)?;

        let mut structure = BTreeMap::new();
        for spec in specializations {
            structure.insert(
                spec.to_string(),
                RepoGroup::prefixed(
                    format!("Department work on {}", spec),
                    &format!("{}-{}", department, spec),
                    &["models", "datasets", "evaluations"],
                ),
            );
        }

        let namespace = EnterpriseNamespace {
            neural_endpoints: endpoints(
                &org_name,
                &[
                    ("primary_interface", "department/interface"),
                    ("knowledge_export", "department/knowledge"),
                ],
            ),
            org_name,
            namespace_type: NamespaceType::Department,
            owner_model: owner_model.to_string(),
            specialization_domains: strings(specializations),
            repository_structure: structure,
            collaboration_interfaces: strings(&["semantic_api", "model_registry"]),
            model_channels: BTreeMap::new(),
        };
        Ok(self.register(namespace))
    }

    /// The enterprise's routing and monitoring infrastructure
    pub fn create_transport_hub_namespace(&mut self) -> Result<EnterpriseNamespace, EnterpriseError> {
        let org_name = format!("{}-neural-transport-hub", self.enterprise_name);
        self.ensure_vacant(&org_name)?;

        let structure: BTreeMap<String, RepoGroup> = [
            (
                "routing-engine",
                RepoGroup::plain(
                    "Intelligent message routing",
                    &[
                        "semantic-routing-algorithms",
                        "context-aware-switching",
                        "load-balancing-systems",
                    ],
                ),
            ),
            (
                "protocol-stack",
                RepoGroup::plain(
                    "Neural transport protocols",
                    &[
                        "neural-transport-layer",
                        "semantic-preservation-layer",
                        "knowledge-synchronization-layer",
                        "quality-assurance-layer",
                    ],
                ),
            ),
            (
                "bandwidth-management",
                RepoGroup::plain(
                    "Cognitive bandwidth optimization",
                    &[
                        "traffic-analysis-engine",
                        "bandwidth-allocation-algorithms",
                        "congestion-control-systems",
                    ],
                ),
            ),
            (
                "security-layer",
                RepoGroup::plain(
                    "Neural pathway security",
                    &[
                        "authentication-protocols",
                        "message-integrity-verification",
                        "access-control-systems",
                    ],
                ),
            ),
            (
                "monitoring-systems",
                RepoGroup::plain(
                    "Network health and analytics",
                    &[
                        "pathway-health-monitors",
                        "performance-analytics",
                        "anomaly-detection-systems",
                    ],
                ),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let namespace = EnterpriseNamespace {
            neural_endpoints: endpoints(
                &org_name,
                &[
                    ("primary_router", "router/primary"),
                    ("backup_router", "router/backup"),
                    ("monitoring_interface", "monitor/interface"),
                    ("management_console", "admin/console"),
                ],
            ),
            org_name,
            namespace_type: NamespaceType::TransportHub,
            owner_model: "enterprise_infrastructure".into(),
            specialization_domains: strings(&[
                "neural_networking",
                "routing_protocols",
                "bandwidth_management",
            ]),
            repository_structure: structure,
            collaboration_interfaces: strings(&[
                "universal_neural_api",
                "monitoring_dashboards",
                "admin_interfaces",
            ]),
            model_channels: BTreeMap::new(),
        };
        Ok(self.register(namespace))
    }

    fn orgs_of(&self, namespace_type: NamespaceType) -> Vec<String> {
        self.namespaces
            .values()
            .filter(|ns| ns.namespace_type == namespace_type)
            .map(|ns| ns.org_name.clone())
            .collect()
    }

    pub fn specialization_matrix(&self) -> BTreeMap<String, Vec<String>> {
        let mut matrix: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for namespace in self.namespaces.values() {
            for domain in &namespace.specialization_domains {
                matrix
                    .entry(domain.clone())
                    .or_default()
                    .push(namespace.org_name.clone());
            }
        }
        matrix
    }

    /// Edges join orgs that share a specialization; every org also links to each workbench
    pub fn collaboration_graph(&self) -> BTreeMap<String, Vec<String>> {
        self.namespaces
            .iter()
            .map(|(org, namespace)| {
                let domains: BTreeSet<&String> = namespace.specialization_domains.iter().collect();
                let peers = self
                    .namespaces
                    .iter()
                    .filter(|(other_org, other)| {
                        *other_org != org
                            && (other.namespace_type == NamespaceType::Workbench
                                || other
                                    .specialization_domains
                                    .iter()
                                    .any(|d| domains.contains(d)))
                    })
                    .map(|(other_org, _)| other_org.clone())
                    .collect();
                (org.clone(), peers)
            })
            .collect()
    }

    pub fn generate_enterprise_manifest(&self) -> EnterpriseManifest {
        EnterpriseManifest {
            enterprise_name: self.enterprise_name.clone(),
            architecture_type: "cognitive_ecosystem".into(),
            total_namespaces: self.namespaces.len(),
            cognitive_cities: self.orgs_of(NamespaceType::CognitiveCity),
            active_workbenches: self.workbenches.iter().map(|(p, _)| p.clone()).collect(),
            neural_topology: NeuralTopology {
                routing_table_size: self.routing_table.len(),
                transport_hubs: self.orgs_of(NamespaceType::TransportHub),
                total_endpoints: self
                    .namespaces
                    .values()
                    .map(EnterpriseNamespace::endpoint_count)
                    .sum(),
            },
            specialization_matrix: self.specialization_matrix(),
            collaboration_graph: self.collaboration_graph(),
            namespaces: self.namespaces.clone(),
        }
    }
}
