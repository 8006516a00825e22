// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::ecology::{CognitiveCity, ContextualMemoryPattern, NeuralTransportNetwork, ParticleSwarm};

pub const FORGE_NAMESPACE: &str = "github.com/organizations/cogpilot";

const REPOSITORY_ACTIVATION: f64 = 0.1;
const REPOSITORY_MATURITY: f64 = 0.2;
const TRANSPORT_ACTIVATION: f64 = 0.15;
const TRANSPORT_MATURITY: f64 = 0.1;
const SELF_REFERENTIAL_MATURITY: f64 = 0.75;

/// Repository name and the specializations it exercises
const FOUNDATIONAL_REPOSITORIES: [(&str, &[&str]); 5] = [
    (
        "cognitive-architecture",
        &["cognitive_architecture", "living_architecture_patterns"],
    ),
    (
        "particle-swarm-accelerator",
        &["particle_swarm_optimization", "distributed_cognition"],
    ),
    (
        "operationalized-rag-fabric",
        &["operationalized_rag_fabric", "knowledge_graphs"],
    ),
    (
        "neural-transport-channels",
        &["neural_transport_protocols", "inter_org_communication"],
    ),
    (
        "living-architecture-demos",
        &["self_designing_systems", "meta_cognitive_protocols"],
    ),
];

const KNOWLEDGE_BASE_REPOSITORIES: [&str; 5] = [
    "github/awesome-copilot",
    "microsoft/copilot-camp",
    "yuhattor/copilot-patterns",
    "CopilotKit/CopilotKit",
    "copilot-extensions/preview-sdk.js",
];

const NEXT_EVOLUTION_STEPS: [&str; 5] = [
    "Monitor emergent cognitive behaviors",
    "Expand knowledge base with Phase 2 repositories",
    "Develop advanced neural transport protocols",
    "Implement meta-cognitive monitoring systems",
    "Create evolutionary adaptation mechanisms",
];

/// Snapshot of the forged city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeReport {
    pub forge_timestamp: DateTime<Utc>,
    pub city: CognitiveCity,
    pub memory_patterns_created: usize,
    /// Pattern id -> embedding length; 0 for unencoded patterns
    pub encoded_patterns: BTreeMap<String, usize>,
    pub knowledge_base: Vec<String>,
    pub neural_transport_links: usize,
    pub self_referential_loop_active: bool,
    pub next_evolution_steps: Vec<String>,
}

/// Grows the primary cognitive city from a seed state in five phases:
/// foundational repositories, custom instructions, knowledge base, transport
/// links and the self-referential loop.
///
/// Patterns encoded during the forge get the city's current maturity as a
/// swarm bonus, so later phases score higher than earlier ones.
#[derive(Debug)]
pub struct CognitiveForge {
    city: CognitiveCity,
    swarm: ParticleSwarm,
    transport: NeuralTransportNetwork,
    patterns: BTreeMap<String, ContextualMemoryPattern>,
    knowledge_base: Vec<String>,
    loop_active: bool,
}

impl CognitiveForge {
    pub fn new(swarm: ParticleSwarm) -> Self {
        Self {
            city: seed_city(),
            swarm,
            transport: NeuralTransportNetwork::new(),
            patterns: BTreeMap::new(),
            knowledge_base: Vec::new(),
            loop_active: false,
        }
    }

    pub fn city(&self) -> &CognitiveCity {
        &self.city
    }

    pub fn memory_pattern(&self, pattern_id: &str) -> Option<&ContextualMemoryPattern> {
        self.patterns.get(pattern_id)
    }

    /// Run every phase in order and report the result
    pub fn forge(&mut self) -> ForgeReport {
        self.create_foundational_repositories();
        self.deploy_custom_instructions();
        self.configure_knowledge_base();
        self.establish_neural_transport();
        self.initiate_self_referential_loop();
        tracing::info!(
            city = %self.city.name,
            maturity = self.city.cognitive_maturity,
            patterns = self.patterns.len(),
            "Cognitive forge complete"
        );
        self.report()
    }

    pub fn create_foundational_repositories(&mut self) {
        for (repository, specializations) in FOUNDATIONAL_REPOSITORIES {
            for specialty in specializations {
                if let Some(level) = self.city.activation_landscape.get_mut(*specialty) {
                    *level += REPOSITORY_ACTIVATION;
                }
            }
            tracing::debug!(repository, "Created foundational repository");
        }
        self.city.repository_count = FOUNDATIONAL_REPOSITORIES.len();
        self.city.cognitive_maturity += REPOSITORY_MATURITY;
    }

    pub fn deploy_custom_instructions(&mut self) {
        let pattern = self.pattern(
            "cogpilot_custom_instructions_v1",
            &[
                ("cognitive_architecture", 0.95),
                ("ordo_ab_chao_principles", 0.90),
                ("fractal_organization", 0.85),
                ("neural_substrate_thinking", 0.88),
                ("natural_language_preservation", 0.92),
            ],
            0.95,
            json!({"action": "deploy_custom_instructions", "context": "organization settings", "success": true}),
        );
        self.encode(pattern);
    }

    /// Foundational repositories plus the city's own, stored unencoded
    pub fn configure_knowledge_base(&mut self) {
        let owner = self
            .city
            .namespace
            .rsplit('/')
            .next()
            .unwrap_or(&self.city.namespace)
            .to_string();
        self.knowledge_base = KNOWLEDGE_BASE_REPOSITORIES
            .iter()
            .map(|r| r.to_string())
            .chain(
                FOUNDATIONAL_REPOSITORIES
                    .iter()
                    .map(|(name, _)| format!("{}/{}", owner, name)),
            )
            .collect();

        let pattern = self.pattern(
            "self_referential_knowledge_base_v1",
            &[
                ("self_referential_enhancement", 0.98),
                ("cognitive_evolution", 0.92),
                ("pattern_recognition", 0.88),
                ("architectural_awareness", 0.90),
            ],
            0.92,
            json!({"action": "configure_knowledge_base", "repositories_added": self.knowledge_base.len()}),
        );
        self.patterns.insert(pattern.pattern_id.clone(), pattern);
    }

    pub fn establish_neural_transport(&mut self) {
        let links = self.transport.establish_links(&self.city);
        if let Some(level) = self
            .city
            .activation_landscape
            .get_mut("neural_transport_protocols")
        {
            *level += TRANSPORT_ACTIVATION;
        }
        self.city.cognitive_maturity += TRANSPORT_MATURITY;
        tracing::debug!(links, "Established forge transport links");
    }

    pub fn initiate_self_referential_loop(&mut self) {
        let maturity_before = self.city.cognitive_maturity;
        let pattern = self.pattern(
            "self_referential_loop_initialization",
            &[
                ("meta_cognitive_awareness", 0.95),
                ("recursive_enhancement", 0.88),
                ("emergent_behavior_tracking", 0.85),
                ("evolutionary_adaptation", 0.90),
            ],
            0.88,
            json!({"action": "initiate_self_referential_loop", "cognitive_maturity_before": maturity_before}),
        );
        self.encode(pattern);
        self.city.cognitive_maturity = SELF_REFERENTIAL_MATURITY;
        self.loop_active = true;
    }

    pub fn report(&self) -> ForgeReport {
        ForgeReport {
            forge_timestamp: Utc::now(),
            city: self.city.clone(),
            memory_patterns_created: self.patterns.len(),
            encoded_patterns: self
                .patterns
                .values()
                .map(|p| {
                    let dims = p.embedding_vector.as_ref().map_or(0, Vec::len);
                    (p.pattern_id.clone(), dims)
                })
                .collect(),
            knowledge_base: self.knowledge_base.clone(),
            neural_transport_links: self.transport.len(),
            self_referential_loop_active: self.loop_active,
            next_evolution_steps: NEXT_EVOLUTION_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn pattern(
        &self,
        pattern_id: &str,
        profile: &[(&str, f64)],
        salience: f64,
        trace: Value,
    ) -> ContextualMemoryPattern {
        let mut step = Map::new();
        if let Value::Object(fields) = trace {
            step.extend(fields);
        }
        step.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));

        ContextualMemoryPattern {
            pattern_id: pattern_id.to_string(),
            priority_profile: profile.iter().map(|(k, w)| (k.to_string(), *w)).collect(),
            execution_trace: vec![step],
            embedding_vector: None,
            salience_score: salience,
            organization_context: self.city.namespace.clone(),
        }
    }

    fn encode(&mut self, mut pattern: ContextualMemoryPattern) {
        let outcome = self
            .swarm
            .optimize_with_bonus(&pattern, self.city.cognitive_maturity);
        tracing::info!(
            pattern_id = %pattern.pattern_id,
            maturity_bonus = self.city.cognitive_maturity,
            best_score = outcome.best_score,
            "Forged memory pattern"
        );
        pattern.embedding_vector = Some(outcome.embedding);
        self.city
            .memory_patterns
            .insert(pattern.pattern_id.clone(), pattern.salience_score);
        self.patterns.insert(pattern.pattern_id.clone(), pattern);
    }
}

fn seed_city() -> CognitiveCity {
    let landscape = [
        ("cognitive_architecture", 0.95),
        ("particle_swarm_optimization", 0.85),
        ("operationalized_rag_fabric", 0.90),
        ("neural_transport_protocols", 0.80),
        ("living_architecture_patterns", 0.92),
        ("self_designing_systems", 0.75),
        ("meta_cognitive_protocols", 0.70),
    ];
    CognitiveCity {
        name: "Cogpilot Primary".to_string(),
        namespace: FORGE_NAMESPACE.to_string(),
        specializations: landscape.iter().map(|(s, _)| s.to_string()).collect(),
        neural_transport_channels: BTreeMap::from([
            (
                "cogcities_channel".to_string(),
                "github.com/organizations/cogcities".to_string(),
            ),
            (
                "cosmo_enterprise_channel".to_string(),
                "github.com/enterprises/cosmo".to_string(),
            ),
        ]),
        memory_patterns: BTreeMap::new(),
        activation_landscape: landscape
            .iter()
            .map(|(s, level)| (s.to_string(), *level))
            .collect(),
        repository_count: 0,
        cognitive_maturity: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecology::SwarmConfig;

    fn forge() -> CognitiveForge {
        CognitiveForge::new(ParticleSwarm::new(SwarmConfig {
            particles: 4,
            iterations: 10,
            dimensions: 16,
            seed: 11,
            tolerance: 1e-6,
            patience: 0,
        }))
    }

    #[test]
    fn test_repositories_raise_activation_and_maturity() {
        let mut forge = forge();
        forge.create_foundational_repositories();

        let city = forge.city();
        assert_eq!(city.repository_count, 5);
        assert!((city.cognitive_maturity - 0.2).abs() < 1e-9);
        assert!((city.activation("cognitive_architecture") - 1.05).abs() < 1e-9);
        // specializations the city does not hold are not created
        assert_eq!(city.activation("knowledge_graphs"), 0.0);
    }

    #[test]
    fn test_full_forge() {
        let mut forge = forge();
        let report = forge.forge();

        assert_eq!(report.city.cognitive_maturity, 0.75);
        assert_eq!(report.city.repository_count, 5);
        assert_eq!(report.memory_patterns_created, 3);
        assert_eq!(report.encoded_patterns["cogpilot_custom_instructions_v1"], 16);
        assert_eq!(report.encoded_patterns["self_referential_loop_initialization"], 16);
        assert_eq!(report.encoded_patterns["self_referential_knowledge_base_v1"], 0);
        assert_eq!(report.knowledge_base.len(), 10);
        assert!(report
            .knowledge_base
            .contains(&"cogpilot/neural-transport-channels".to_string()));
        assert_eq!(report.neural_transport_links, 2);
        assert!(report.self_referential_loop_active);
        assert!((report.city.activation("neural_transport_protocols") - 1.05).abs() < 1e-9);
        assert_eq!(report.city.memory_patterns.len(), 2);
    }

    #[test]
    fn test_maturity_bonus_applied_when_encoding() {
        let mut forge = forge();
        forge.create_foundational_repositories();
        forge.deploy_custom_instructions();

        let pattern = forge
            .memory_pattern("cogpilot_custom_instructions_v1")
            .unwrap()
            .clone();
        let plain = forge.swarm.optimize(&pattern);
        let bonused = forge.swarm.optimize_with_bonus(&pattern, 0.2);
        assert_eq!(pattern.embedding_vector.as_ref(), Some(&bonused.embedding));
        assert!((bonused.best_score - plain.best_score * 1.2).abs() < 1e-9);
    }
}
