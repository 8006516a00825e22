// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Smallest evolvable unit of protocol behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolGene {
    pub gene_id: String,
    pub function: String,
    pub parameters: Map<String, Value>,
    pub evolution_history: Vec<String>,
    pub fitness_score: f64,
    pub mutation_rate: f64,
}

impl ProtocolGene {
    fn base(gene_id: &str, function: &str, parameters: Value, mutation_rate: f64) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            gene_id: gene_id.to_string(),
            function: function.to_string(),
            parameters,
            evolution_history: vec!["base_version".to_string()],
            fitness_score: 1.0,
            mutation_rate,
        }
    }

    /// Lower-case words found in the id, function and parameters
    pub fn keywords(&self) -> BTreeSet<String> {
        let mut words = BTreeSet::new();
        collect_words(&self.gene_id, &mut words);
        collect_words(&self.function, &mut words);
        for (key, value) in &self.parameters {
            collect_words(key, &mut words);
            collect_value_words(value, &mut words);
        }
        words
    }
}

pub(crate) fn collect_words(text: &str, words: &mut BTreeSet<String>) {
    words.extend(
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .map(str::to_lowercase),
    );
}

pub(crate) fn collect_value_words(value: &Value, words: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => collect_words(s, words),
        Value::Array(items) => items.iter().for_each(|v| collect_value_words(v, words)),
        Value::Object(map) => {
            for (k, v) in map {
                collect_words(k, words);
                collect_value_words(v, words);
            }
        }
        _ => {}
    }
}

/// A complete protocol: an ordered gene sequence plus lineage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolOrganism {
    pub organism_id: String,
    pub name: String,
    pub purpose: String,
    pub gene_sequence: Vec<ProtocolGene>,
    pub environment_adaptations: BTreeMap<String, String>,
    pub collaboration_interfaces: Vec<String>,
    pub generation: u32,
    pub parent_organisms: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl ProtocolOrganism {
    /// Mean gene fitness, 0 for an organism without genes
    pub fn fitness(&self) -> f64 {
        if self.gene_sequence.is_empty() {
            return 0.0;
        }
        self.gene_sequence.iter().map(|g| g.fitness_score).sum::<f64>()
            / self.gene_sequence.len() as f64
    }

    pub fn gene(&self, function: &str) -> Option<&ProtocolGene> {
        self.gene_sequence.iter().find(|g| g.function == function)
    }

    /// Id without any `_genN` suffix
    pub fn lineage_root(&self) -> &str {
        match self.organism_id.rsplit_once("_gen") {
            Some((root, suffix)) if suffix.parse::<u32>().is_ok() => root,
            _ => &self.organism_id,
        }
    }
}

/// The self-describing protocols the designer is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaProtocol {
    Designer,
    Evolution,
    Introspection,
    Collaboration,
}

impl MetaProtocol {
    pub const ALL: [MetaProtocol; 4] = [
        MetaProtocol::Designer,
        MetaProtocol::Evolution,
        MetaProtocol::Introspection,
        MetaProtocol::Collaboration,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MetaProtocol::Designer => "protocol_designer",
            MetaProtocol::Evolution => "evolution_engine",
            MetaProtocol::Introspection => "introspection_engine",
            MetaProtocol::Collaboration => "inter_protocol_collaboration",
        }
    }

    pub fn organism(&self) -> ProtocolOrganism {
        match self {
            MetaProtocol::Designer => designer_protocol(),
            MetaProtocol::Evolution => evolution_protocol(),
            MetaProtocol::Introspection => introspection_protocol(),
            MetaProtocol::Collaboration => collaboration_protocol(),
        }
    }
}

fn meta_organism(
    organism_id: &str,
    name: &str,
    purpose: &str,
    gene_sequence: Vec<ProtocolGene>,
    adaptations: &[(&str, &str)],
    interfaces: &[&str],
) -> ProtocolOrganism {
    ProtocolOrganism {
        organism_id: organism_id.to_string(),
        name: name.to_string(),
        purpose: purpose.to_string(),
        gene_sequence,
        environment_adaptations: adaptations
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        collaboration_interfaces: interfaces.iter().map(|i| i.to_string()).collect(),
        generation: 1,
        parent_organisms: Vec::new(),
        history: vec!["bootstrapped".to_string()],
    }
}

fn designer_protocol() -> ProtocolOrganism {
    meta_organism(
        "meta_protocol_designer_v1",
        "Introspective Protocol Designer",
        "Design and evolve communication protocols using self-referential analysis",
        vec![
            ProtocolGene::base(
                "requirement_analysis",
                "analyze_design_requirements",
                json!({
                    "context_depth": "deep",
                    "stakeholder_analysis": true,
                    "constraint_mapping": true,
                    "success_criteria_generation": true
                }),
                0.1,
            ),
            ProtocolGene::base(
                "architecture_synthesis",
                "synthesize_protocol_architecture",
                json!({
                    "pattern_matching": "advanced",
                    "component_composition": "modular",
                    "interface_design": "semantic",
                    "optimization_goals": ["performance", "maintainability", "evolvability"]
                }),
                0.15,
            ),
            ProtocolGene::base(
                "validation_engine",
                "validate_protocol_design",
                json!({
                    "formal_verification": true,
                    "simulation_testing": true,
                    "edge_case_analysis": true,
                    "compatibility_checking": true
                }),
                0.05,
            ),
            ProtocolGene::base(
                "evolution_planner",
                "plan_protocol_evolution",
                json!({
                    "adaptation_strategies": ["incremental", "revolutionary"],
                    "feedback_integration": "continuous",
                    "version_management": "semantic",
                    "backward_compatibility": "configurable"
                }),
                0.2,
            ),
        ],
        &[
            ("collaborative_environments", "enhanced"),
            ("competitive_environments", "strategic"),
            ("innovation_phases", "exploratory"),
            ("commoditization_phases", "optimizing"),
        ],
        &["meta_protocol_api", "evolution_feedback_loop", "design_pattern_sharing"],
    )
}

fn evolution_protocol() -> ProtocolOrganism {
    meta_organism(
        "meta_evolution_engine_v1",
        "Protocol Evolution Engine",
        "Evolve and adapt protocols based on environmental feedback",
        vec![
            ProtocolGene::base(
                "fitness_evaluation",
                "evaluate_protocol_fitness",
                json!({
                    "performance_metrics": ["latency", "throughput", "accuracy", "adaptability"],
                    "user_satisfaction": "continuous_feedback",
                    "resource_efficiency": "multi_dimensional",
                    "evolutionary_potential": "mutation_space_analysis"
                }),
                0.1,
            ),
            ProtocolGene::base(
                "mutation_engine",
                "generate_protocol_mutations",
                json!({
                    "mutation_types": ["parameter_tuning", "component_addition", "structure_modification"],
                    "mutation_intensity": "adaptive",
                    "constraint_preservation": true,
                    "novelty_seeking": "balanced"
                }),
                0.25,
            ),
            ProtocolGene::base(
                "selection_pressure",
                "apply_evolutionary_pressure",
                json!({
                    "selection_criteria": "multi_objective",
                    "diversity_preservation": true,
                    "niche_protection": "specialization_bonus",
                    "competition_balance": "cooperative_competitive"
                }),
                0.1,
            ),
        ],
        &[
            ("peace_phases", "exploration_emphasis"),
            ("war_phases", "survival_emphasis"),
            ("core_zones", "stability_focus"),
            ("edge_zones", "innovation_focus"),
        ],
        &["fitness_reporting", "mutation_coordination", "selection_consensus"],
    )
}

fn introspection_protocol() -> ProtocolOrganism {
    meta_organism(
        "meta_introspection_engine_v1",
        "Protocol Introspection Engine",
        "Analyze protocol structure and behavior to expose improvement opportunities",
        vec![
            ProtocolGene::base(
                "self_analysis",
                "analyze_protocol_structure",
                json!({
                    "analysis_depth": "recursive",
                    "structure_mapping": ["genes", "interfaces", "adaptations"],
                    "bottleneck_detection": true
                }),
                0.1,
            ),
            ProtocolGene::base(
                "performance_monitoring",
                "monitor_protocol_performance",
                json!({
                    "metrics": ["latency", "throughput", "error_rate"],
                    "sampling": "continuous",
                    "anomaly_detection": true
                }),
                0.1,
            ),
            ProtocolGene::base(
                "adaptation_planning",
                "plan_protocol_adaptation",
                json!({
                    "planning_horizon": "multi_generation",
                    "context_synchronization": "real_time",
                    "risk_assessment": true
                }),
                0.15,
            ),
        ],
        &[
            ("stable_phases", "deep_analysis"),
            ("volatile_phases", "rapid_feedback"),
        ],
        &["introspection_api", "performance_stream", "adaptation_proposals"],
    )
}

fn collaboration_protocol() -> ProtocolOrganism {
    meta_organism(
        "meta_collaboration_v1",
        "Inter-Protocol Collaboration Engine",
        "Coordinate protocols that jointly design and negotiate new protocols",
        vec![
            ProtocolGene::base(
                "consensus_building",
                "build_protocol_consensus",
                json!({
                    "consensus_model": "weighted_fitness_voting",
                    "conflict_resolution": "consensus_based",
                    "quorum": "two_thirds"
                }),
                0.1,
            ),
            ProtocolGene::base(
                "knowledge_sharing",
                "share_protocol_knowledge",
                json!({
                    "knowledge_fusion": "intelligent",
                    "semantic_alignment": "automatic",
                    "sharing_scope": "ecosystem"
                }),
                0.15,
            ),
            ProtocolGene::base(
                "negotiation",
                "negotiate_protocol_interfaces",
                json!({
                    "interface_matching": "semantic",
                    "cross_model_compatibility": true,
                    "fallback_strategy": "graceful_degradation"
                }),
                0.2,
            ),
        ],
        &[
            ("collaborative_environments", "cooperative"),
            ("competitive_environments", "guarded"),
        ],
        &["collaboration_channel", "consensus_api", "knowledge_exchange"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_protocols_are_distinct() {
        let ids: BTreeSet<String> = MetaProtocol::ALL
            .iter()
            .map(|m| m.organism().organism_id)
            .collect();
        assert_eq!(ids.len(), 4);
        let designer = MetaProtocol::Designer.organism();
        assert_eq!(designer.gene_sequence.len(), 4);
        assert_eq!(designer.fitness(), 1.0);
        assert!(designer.gene("analyze_design_requirements").is_some());
    }

    #[test]
    fn test_gene_keywords_include_nested_values() {
        let designer = MetaProtocol::Designer.organism();
        let words = designer.gene_sequence[1].keywords();
        assert!(words.contains("evolvability"));
        assert!(words.contains("semantic"));
        assert!(words.contains("synthesize"));
    }

    #[test]
    fn test_lineage_root() {
        let mut organism = MetaProtocol::Evolution.organism();
        organism.organism_id = "protocol_ab12cd34_gen3".into();
        assert_eq!(organism.lineage_root(), "protocol_ab12cd34");
        organism.organism_id = "protocol_generic".into();
        assert_eq!(organism.lineage_root(), "protocol_generic");
    }
}
