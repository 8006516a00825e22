// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::ecology::{
    ActivationTransfer, CognitiveCity, ContextualMemoryPattern, NeuralTransportNetwork,
    ParticleSwarm,
};

/// Registry of cognitive cities and the memory patterns encoded into them.
///
/// Encoding a pattern runs the swarm to obtain its embedding, then raises the
/// owning city's activation for every specialization in the pattern's
/// priority profile and forwards the boost over the city's transport links.
#[derive(Debug, Default)]
pub struct OperationalizedRagFabric {
    cities: BTreeMap<String, CognitiveCity>,
    patterns: BTreeMap<String, ContextualMemoryPattern>,
    transport: NeuralTransportNetwork,
    swarm: ParticleSwarm,
}

impl OperationalizedRagFabric {
    pub fn new(swarm: ParticleSwarm) -> Self {
        Self {
            swarm,
            ..Self::default()
        }
    }

    pub fn register_cognitive_city(&mut self, city: CognitiveCity) {
        let links = self.transport.establish_links(&city);
        tracing::debug!(
            city = %city.name,
            namespace = %city.namespace,
            links,
            "Registered cognitive city"
        );
        self.cities.insert(city.namespace.clone(), city);
    }

    pub fn city(&self, namespace: &str) -> Option<&CognitiveCity> {
        self.cities.get(namespace)
    }

    pub fn cities(&self) -> impl Iterator<Item = &CognitiveCity> {
        self.cities.values()
    }

    pub fn memory_pattern(&self, pattern_id: &str) -> Option<&ContextualMemoryPattern> {
        self.patterns.get(pattern_id)
    }

    pub fn transport(&self) -> &NeuralTransportNetwork {
        &self.transport
    }

    /// Embed the pattern, update activation landscapes and return what was transported.
    ///
    /// A pattern whose organization is not registered is still stored with its
    /// embedding; it simply moves no activation.
    pub fn encode_memory_pattern(
        &mut self,
        mut pattern: ContextualMemoryPattern,
    ) -> Vec<ActivationTransfer> {
        let outcome = self.swarm.optimize(&pattern);
        tracing::info!(
            pattern_id = %pattern.pattern_id,
            dimensions = outcome.embedding.len(),
            best_score = outcome.best_score,
            iterations = outcome.iterations_run,
            converged_early = outcome.converged_early,
            "Encoded memory pattern"
        );
        pattern.embedding_vector = Some(outcome.embedding);

        let transfers = self.update_activation_landscape(&pattern);
        self.patterns.insert(pattern.pattern_id.clone(), pattern);
        transfers
    }

    fn update_activation_landscape(
        &mut self,
        pattern: &ContextualMemoryPattern,
    ) -> Vec<ActivationTransfer> {
        let Some(city) = self.cities.get_mut(&pattern.organization_context) else {
            return Vec::new();
        };

        city.memory_patterns
            .insert(pattern.pattern_id.clone(), pattern.salience_score);

        let mut transfers = Vec::new();
        for specialty in city.specializations.clone() {
            let Some(priority) = pattern.priority_profile.get(&specialty) else {
                continue;
            };
            let boost = priority * pattern.salience_score;
            city.boost(&specialty, boost);
            transfers.extend(self.transport.propagate_activation(city, &specialty, boost));
        }

        for transfer in &transfers {
            if let Some(target) = self.cities.get_mut(&transfer.target) {
                if target.has_specialization(&transfer.specialty) {
                    target.boost(&transfer.specialty, transfer.activation);
                }
            }
        }
        transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecology::SwarmConfig;

    const COGPILOT: &str = "github.com/organizations/cogpilot";
    const COGCITIES: &str = "github.com/organizations/cogcities";

    fn city(name: &str, namespace: &str, specs: &[&str], targets: &[&str]) -> CognitiveCity {
        CognitiveCity {
            name: name.into(),
            namespace: namespace.into(),
            specializations: specs.iter().map(|s| s.to_string()).collect(),
            neural_transport_channels: targets
                .iter()
                .enumerate()
                .map(|(i, t)| (format!("channel_{}", i), t.to_string()))
                .collect(),
            memory_patterns: BTreeMap::new(),
            activation_landscape: BTreeMap::new(),
            repository_count: 0,
            cognitive_maturity: 0.0,
        }
    }

    fn fabric() -> OperationalizedRagFabric {
        let swarm = ParticleSwarm::new(SwarmConfig {
            particles: 4,
            iterations: 10,
            dimensions: 16,
            seed: 42,
            tolerance: 1e-6,
            patience: 5,
        });
        let mut fabric = OperationalizedRagFabric::new(swarm);
        fabric.register_cognitive_city(city(
            "Cogpilot",
            COGPILOT,
            &["ml_architecture", "protocol_design"],
            &[COGCITIES, "github.com/enterprises/cosmo"],
        ));
        fabric.register_cognitive_city(city(
            "CogCities",
            COGCITIES,
            &["protocol_design", "distributed_systems"],
            &[COGPILOT],
        ));
        fabric
    }

    fn pattern(org: &str) -> ContextualMemoryPattern {
        ContextualMemoryPattern {
            pattern_id: "ordo_ab_chao".into(),
            priority_profile: [("ml_architecture", 0.9), ("protocol_design", 0.5)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            execution_trace: Vec::new(),
            embedding_vector: None,
            salience_score: 0.8,
            organization_context: org.into(),
        }
    }

    #[test]
    fn test_registration_opens_links() {
        let fabric = fabric();
        assert_eq!(fabric.transport().len(), 3);
        let link = fabric.transport().link(COGPILOT, COGCITIES).unwrap();
        assert_eq!(link.quality, 0.95);
    }

    #[test]
    fn test_encoding_boosts_owner_and_shared_specialties() {
        let mut fabric = fabric();
        let transfers = fabric.encode_memory_pattern(pattern(COGPILOT));

        // two specialties over two links each
        assert_eq!(transfers.len(), 4);

        let owner = fabric.city(COGPILOT).unwrap();
        assert!((owner.activation("ml_architecture") - 0.72).abs() < 1e-9);
        assert!((owner.activation("protocol_design") - 0.4).abs() < 1e-9);
        assert!(owner.memory_patterns.contains_key("ordo_ab_chao"));

        let peer = fabric.city(COGCITIES).unwrap();
        assert!((peer.activation("protocol_design") - 0.4 * 0.95).abs() < 1e-9);
        assert_eq!(peer.activation("ml_architecture"), 0.0);

        let stored = fabric.memory_pattern("ordo_ab_chao").unwrap();
        assert_eq!(stored.embedding_vector.as_ref().unwrap().len(), 16);
    }

    #[test]
    fn test_unknown_organization_moves_no_activation() {
        let mut fabric = fabric();
        let transfers = fabric.encode_memory_pattern(pattern("github.com/organizations/elsewhere"));
        assert!(transfers.is_empty());
        assert!(fabric.memory_pattern("ordo_ab_chao").is_some());
    }
}
