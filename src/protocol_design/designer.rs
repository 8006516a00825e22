// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::errors::DesignError;
use crate::protocol_design::genome::{collect_words, MetaProtocol, ProtocolGene, ProtocolOrganism};
use crate::protocol_design::CollaborativeEcosystem;
use crate::utils::{canonical_hash, short_hash};

const MAX_SELECTED_GENES: usize = 5;
const FALLBACK_GENE: &str = "architecture_synthesis";
const PEACE_TOLERANCE: f64 = 0.1;
const TRANSITION_TOLERANCE: f64 = 0.05;

/// What a new protocol should do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignRequest {
    pub name: String,
    pub purpose: String,
    pub requirements: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub collaboration_interfaces: Vec<String>,
}

impl Default for DesignRequest {
    fn default() -> Self {
        Self {
            name: "Generated Protocol".to_string(),
            purpose: "Custom protocol".to_string(),
            requirements: Vec::new(),
            environment: BTreeMap::new(),
            collaboration_interfaces: Vec::new(),
        }
    }
}

impl DesignRequest {
    pub fn keywords(&self) -> BTreeSet<String> {
        let mut words = BTreeSet::new();
        collect_words(&self.name, &mut words);
        collect_words(&self.purpose, &mut words);
        for text in self.requirements.iter().chain(self.environment.values()) {
            collect_words(text, &mut words);
        }
        words
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemPhase {
    #[default]
    InnovationPeace,
    CompetitiveWar,
    Transition,
}

impl EcosystemPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EcosystemPhase::InnovationPeace => "innovation_peace",
            EcosystemPhase::CompetitiveWar => "competitive_war",
            EcosystemPhase::Transition => "transition",
        }
    }

    /// Whether a mutation from `old` to `new` survives selection
    pub fn accepts(&self, old: f64, new: f64) -> bool {
        match self {
            EcosystemPhase::CompetitiveWar => new > old,
            EcosystemPhase::InnovationPeace => new >= old - PEACE_TOLERANCE,
            EcosystemPhase::Transition => new >= old - TRANSITION_TOLERANCE,
        }
    }
}

/// Observations a protocol is evolved against
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentFeedback {
    /// Percentages, 0-100
    pub performance_metrics: BTreeMap<String, f64>,
    /// Rating, 0-5
    pub user_satisfaction: f64,
    pub ecosystem_phase: EcosystemPhase,
    pub competitive_pressure: f64,
    pub collaboration_success_rate: f64,
}

impl EnvironmentFeedback {
    /// Mean of the normalized observations, clamped to `[0, 1]`
    pub fn fitness_target(&self) -> f64 {
        let mut signals = vec![
            self.user_satisfaction / 5.0,
            self.collaboration_success_rate,
        ];
        if !self.performance_metrics.is_empty() {
            let total: f64 = self.performance_metrics.values().sum();
            signals.push(total / self.performance_metrics.len() as f64 / 100.0);
        }
        (signals.iter().sum::<f64>() / signals.len() as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignValidation {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Structural checks every registered organism passes
pub fn validate_design(organism: &ProtocolOrganism) -> DesignValidation {
    let mut issues = Vec::new();
    if organism.name.trim().is_empty() {
        issues.push("protocol name is empty".to_string());
    }
    if organism.gene_sequence.is_empty() {
        issues.push("gene sequence is empty".to_string());
    }
    let mut seen = HashSet::new();
    for gene in &organism.gene_sequence {
        if !seen.insert(gene.gene_id.as_str()) {
            issues.push(format!("duplicate gene '{}'", gene.gene_id));
        }
        if !(0.0..=1.0).contains(&gene.fitness_score) {
            issues.push(format!(
                "gene '{}' fitness {} outside [0, 1]",
                gene.gene_id, gene.fitness_score
            ));
        }
        if !(0.0..=1.0).contains(&gene.mutation_rate) {
            issues.push(format!(
                "gene '{}' mutation rate {} outside [0, 1]",
                gene.gene_id, gene.mutation_rate
            ));
        }
    }
    DesignValidation {
        valid: issues.is_empty(),
        issues,
    }
}

/// Designs, evolves and federates protocols using its own meta-protocols.
///
/// Nothing can be designed until [`initialize_meta_protocol_system`] has
/// registered the meta organisms and filled the gene pool.
///
/// [`initialize_meta_protocol_system`]: IntrospectiveProtocolDesigner::initialize_meta_protocol_system
#[derive(Debug, Clone, Default)]
pub struct IntrospectiveProtocolDesigner {
    meta_protocols: BTreeMap<MetaProtocol, String>,
    protocols: BTreeMap<String, ProtocolOrganism>,
    gene_pool: BTreeMap<String, ProtocolGene>,
}

impl IntrospectiveProtocolDesigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        !self.meta_protocols.is_empty()
    }

    pub fn initialize_meta_protocol_system(&mut self) {
        for meta in MetaProtocol::ALL {
            let organism = meta.organism();
            for gene in &organism.gene_sequence {
                self.gene_pool.insert(gene.gene_id.clone(), gene.clone());
            }
            self.meta_protocols.insert(meta, organism.organism_id.clone());
            self.protocols.insert(organism.organism_id.clone(), organism);
        }
        tracing::info!(
            meta_protocols = self.meta_protocols.len(),
            genes = self.gene_pool.len(),
            "Meta-protocol system initialized"
        );
    }

    pub fn meta_protocol(&self, meta: MetaProtocol) -> Option<&ProtocolOrganism> {
        self.meta_protocols
            .get(&meta)
            .and_then(|id| self.protocols.get(id))
    }

    pub fn protocol(&self, organism_id: &str) -> Option<&ProtocolOrganism> {
        self.protocols.get(organism_id)
    }

    pub fn protocols(&self) -> impl Iterator<Item = &ProtocolOrganism> {
        self.protocols.values()
    }

    pub fn gene_pool(&self) -> &BTreeMap<String, ProtocolGene> {
        &self.gene_pool
    }

    /// Genes ranked by keyword overlap with `keywords`, best first
    pub fn search_gene_pool(&self, keywords: &BTreeSet<String>) -> Vec<&ProtocolGene> {
        let mut scored: Vec<(usize, &ProtocolGene)> = self
            .gene_pool
            .values()
            .map(|gene| (gene.keywords().intersection(keywords).count(), gene))
            .filter(|(overlap, _)| *overlap > 0)
            .collect();
        scored.sort_by(|(a, ga), (b, gb)| b.cmp(a).then_with(|| ga.gene_id.cmp(&gb.gene_id)));
        scored
            .into_iter()
            .take(MAX_SELECTED_GENES)
            .map(|(_, gene)| gene)
            .collect()
    }

    pub fn design_protocol_using_introspection(
        &mut self,
        request: &DesignRequest,
    ) -> Result<ProtocolOrganism, DesignError> {
        let designer_id = self
            .meta_protocols
            .get(&MetaProtocol::Designer)
            .cloned()
            .ok_or(DesignError::NotInitialized)?;

        let request_hash = canonical_hash(request).map_err(|e| DesignError::InvalidDesign {
            organism_id: request.name.clone(),
            issues: vec![e.to_string()],
        })?;
        let organism_id = format!("protocol_{}", short_hash(&request_hash, 8));

        let mut selected: Vec<ProtocolGene> = self
            .search_gene_pool(&request.keywords())
            .into_iter()
            .cloned()
            .collect();
        if selected.is_empty() {
            selected.extend(self.gene_pool.get(FALLBACK_GENE).cloned());
        }
        for gene in &mut selected {
            gene.evolution_history.push(format!("adapted_for:{}", organism_id));
        }

        let organism = ProtocolOrganism {
            organism_id: organism_id.clone(),
            name: request.name.clone(),
            purpose: request.purpose.clone(),
            gene_sequence: selected,
            environment_adaptations: request.environment.clone(),
            collaboration_interfaces: request.collaboration_interfaces.clone(),
            generation: 1,
            parent_organisms: vec![designer_id],
            history: vec!["designed_via_introspection".to_string()],
        };

        let validation = validate_design(&organism);
        if !validation.valid {
            return Err(DesignError::InvalidDesign {
                organism_id,
                issues: validation.issues,
            });
        }

        tracing::info!(
            organism_id = %organism.organism_id,
            name = %organism.name,
            genes = organism.gene_sequence.len(),
            "Designed protocol"
        );
        self.protocols.insert(organism_id, organism.clone());
        Ok(organism)
    }

    /// Mutate every gene toward the feedback's fitness target.
    ///
    /// Returns the evolved organism when at least one mutation survived
    /// selection and the result validates, otherwise the current organism.
    pub fn evolve_protocol_through_introspection(
        &mut self,
        organism_id: &str,
        feedback: &EnvironmentFeedback,
    ) -> Result<ProtocolOrganism, DesignError> {
        if !self.is_initialized() {
            return Err(DesignError::NotInitialized);
        }
        let current = self
            .protocols
            .get(organism_id)
            .cloned()
            .ok_or_else(|| DesignError::UnknownProtocol(organism_id.to_string()))?;

        let target = feedback.fitness_target();
        let phase = feedback.ecosystem_phase;
        let generation = current.generation + 1;

        let mut accepted = 0;
        let mut genes = current.gene_sequence.clone();
        for gene in &mut genes {
            let old = gene.fitness_score;
            let new = old + gene.mutation_rate * (target - old);
            if phase.accepts(old, new) {
                gene.fitness_score = new;
                gene.evolution_history
                    .push(format!("gen{}:{:.3}->{:.3}", generation, old, new));
                accepted += 1;
            }
        }

        if accepted == 0 {
            tracing::debug!(
                organism_id,
                phase = phase.as_str(),
                "No mutation survived selection"
            );
            return Ok(current);
        }

        let mut history = current.history.clone();
        history.push(format!(
            "evolved:{}:{}/{} genes:pressure={:.2}",
            phase.as_str(),
            accepted,
            genes.len(),
            feedback.competitive_pressure
        ));

        let evolved = ProtocolOrganism {
            organism_id: format!("{}_gen{}", current.lineage_root(), generation),
            gene_sequence: genes,
            generation,
            parent_organisms: vec![current.organism_id.clone()],
            history,
            ..current.clone()
        };

        let validation = validate_design(&evolved);
        if !validation.valid {
            tracing::warn!(
                organism_id = %evolved.organism_id,
                issues = ?validation.issues,
                "Evolved protocol failed validation"
            );
            return Ok(current);
        }

        tracing::info!(
            parent = %current.organism_id,
            organism_id = %evolved.organism_id,
            fitness_before = current.fitness(),
            fitness_after = evolved.fitness(),
            phase = phase.as_str(),
            "Evolved protocol"
        );
        self.protocols
            .insert(evolved.organism_id.clone(), evolved.clone());
        Ok(evolved)
    }

    pub fn create_collaborative_protocol_ecosystem(
        &self,
        organism_ids: &[&str],
    ) -> Result<CollaborativeEcosystem, DesignError> {
        let mut seen = HashSet::new();
        let mut participants = Vec::new();
        for id in organism_ids {
            let organism = self
                .protocols
                .get(*id)
                .ok_or_else(|| DesignError::UnknownProtocol(id.to_string()))?;
            if seen.insert(*id) {
                participants.push(organism);
            }
        }
        let ecosystem = CollaborativeEcosystem::assemble(&participants)?;
        tracing::info!(
            ecosystem_id = %ecosystem.ecosystem_id,
            participants = ecosystem.participants.len(),
            shared_genes = ecosystem.shared_gene_pool.len(),
            "Created collaborative protocol ecosystem"
        );
        Ok(ecosystem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn designer() -> IntrospectiveProtocolDesigner {
        let mut designer = IntrospectiveProtocolDesigner::new();
        designer.initialize_meta_protocol_system();
        designer
    }

    fn request() -> DesignRequest {
        DesignRequest {
            name: "Adaptive Mutation Protocol".into(),
            purpose: "Evaluate fitness of latency and throughput under mutation".into(),
            requirements: vec!["semantic interface".into()],
            ..DesignRequest::default()
        }
    }

    fn feedback(phase: EcosystemPhase, satisfaction: f64) -> EnvironmentFeedback {
        EnvironmentFeedback {
            performance_metrics: [("latency".to_string(), 80.0), ("accuracy".to_string(), 90.0)]
                .into_iter()
                .collect(),
            user_satisfaction: satisfaction,
            ecosystem_phase: phase,
            competitive_pressure: 0.4,
            collaboration_success_rate: 0.7,
        }
    }

    #[test]
    fn test_design_requires_initialization() {
        let mut designer = IntrospectiveProtocolDesigner::new();
        assert_eq!(
            designer.design_protocol_using_introspection(&request()),
            Err(DesignError::NotInitialized)
        );
    }

    #[test]
    fn test_initialize_fills_gene_pool() {
        let designer = designer();
        assert_eq!(designer.protocols().count(), 4);
        assert_eq!(designer.gene_pool().len(), 13);
        assert!(designer.meta_protocol(MetaProtocol::Evolution).is_some());
    }

    #[test]
    fn test_design_selects_overlapping_genes() {
        let mut designer = designer();
        let organism = designer
            .design_protocol_using_introspection(&request())
            .unwrap();

        assert!(organism.organism_id.starts_with("protocol_"));
        assert_eq!(organism.organism_id.len(), "protocol_".len() + 8);
        assert!(organism.gene_sequence.len() <= MAX_SELECTED_GENES);
        assert!(organism.gene("evaluate_protocol_fitness").is_some());
        assert!(organism.gene("generate_protocol_mutations").is_some());
        assert_eq!(organism.parent_organisms, vec!["meta_protocol_designer_v1"]);
        assert!(designer.protocol(&organism.organism_id).is_some());

        // adapting a copy never touches the pool
        let pooled = &designer.gene_pool()["mutation_engine"];
        assert_eq!(pooled.evolution_history, vec!["base_version"]);
    }

    #[test]
    fn test_design_id_is_stable_per_request() {
        let mut designer = designer();
        let first = designer.design_protocol_using_introspection(&request()).unwrap();
        let second = designer.design_protocol_using_introspection(&request()).unwrap();
        assert_eq!(first.organism_id, second.organism_id);
    }

    #[test]
    fn test_unmatched_request_uses_fallback_gene() {
        let mut designer = designer();
        let organism = designer
            .design_protocol_using_introspection(&DesignRequest {
                name: "zz".into(),
                purpose: "qq".into(),
                ..DesignRequest::default()
            })
            .unwrap();
        assert_eq!(organism.gene_sequence.len(), 1);
        assert_eq!(organism.gene_sequence[0].gene_id, FALLBACK_GENE);
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let mut designer = designer();
        let result = designer.design_protocol_using_introspection(&DesignRequest {
            name: "  ".into(),
            ..request()
        });
        assert!(matches!(result, Err(DesignError::InvalidDesign { .. })));
    }

    #[test]
    fn test_fitness_target() {
        let fb = feedback(EcosystemPhase::InnovationPeace, 4.0);
        // mean(0.8, 0.7, 0.85)
        assert!((fb.fitness_target() - 0.7833333333).abs() < 1e-9);
        assert_eq!(EnvironmentFeedback::default().fitness_target(), 0.0);
    }

    #[test]
    fn test_peace_evolution_accepts_small_regressions() {
        let mut designer = designer();
        let organism = designer.design_protocol_using_introspection(&request()).unwrap();
        let evolved = designer
            .evolve_protocol_through_introspection(
                &organism.organism_id,
                &feedback(EcosystemPhase::InnovationPeace, 4.0),
            )
            .unwrap();

        assert_eq!(evolved.generation, 2);
        assert_eq!(evolved.organism_id, format!("{}_gen2", organism.organism_id));
        assert_eq!(evolved.parent_organisms, vec![organism.organism_id.clone()]);
        assert!(evolved.fitness() < organism.fitness());
        assert_eq!(evolved.history.len(), organism.history.len() + 1);

        let again = designer
            .evolve_protocol_through_introspection(
                &evolved.organism_id,
                &feedback(EcosystemPhase::Transition, 4.0),
            )
            .unwrap();
        assert_eq!(again.organism_id, format!("{}_gen3", organism.organism_id));
    }

    #[test]
    fn test_war_rejects_regressions() {
        let mut designer = designer();
        let evolved = designer
            .evolve_protocol_through_introspection(
                "meta_evolution_engine_v1",
                &feedback(EcosystemPhase::CompetitiveWar, 4.0),
            )
            .unwrap();
        // every gene starts at 1.0, so any move toward a lower target is a regression
        assert_eq!(evolved.organism_id, "meta_evolution_engine_v1");
        assert_eq!(evolved.generation, 1);
    }

    #[test]
    fn test_evolving_unknown_protocol() {
        let mut designer = designer();
        assert_eq!(
            designer.evolve_protocol_through_introspection(
                "protocol_missing",
                &EnvironmentFeedback::default()
            ),
            Err(DesignError::UnknownProtocol("protocol_missing".into()))
        );
    }

    #[test]
    fn test_validation_catches_bad_genes() {
        let mut organism = MetaProtocol::Designer.organism();
        organism.gene_sequence[0].fitness_score = 1.5;
        let duplicate = organism.gene_sequence[1].clone();
        organism.gene_sequence.push(duplicate);
        let validation = validate_design(&organism);
        assert!(!validation.valid);
        assert_eq!(validation.issues.len(), 2);
    }
}
