// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::DesignError;
use crate::protocol_design::ProtocolOrganism;
use crate::utils::{sha256_hex, short_hash};

const MIN_PARTICIPANTS: usize = 2;

/// Direct channel between two participating protocols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationChannel {
    pub source: String,
    pub target: String,
    pub shared_interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusMechanism {
    pub model: String,
    pub quorum: usize,
    /// Normalized voting weight per participant
    pub weights: BTreeMap<String, f64>,
}

impl ConsensusMechanism {
    /// A proposal passes with a quorum of approvals holding a weighted majority
    pub fn approves(&self, approvals: &[&str]) -> bool {
        let voters: Vec<f64> = approvals
            .iter()
            .filter_map(|id| self.weights.get(*id).copied())
            .collect();
        voters.len() >= self.quorum && voters.iter().sum::<f64>() > 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    pub min_fitness: f64,
    pub validation_required: bool,
    pub conflict_resolution: String,
}

/// Protocols federated to design together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborativeEcosystem {
    pub ecosystem_id: String,
    pub participants: Vec<String>,
    pub topology: Vec<CollaborationChannel>,
    /// Gene id to the participants carrying it
    pub shared_gene_pool: BTreeMap<String, Vec<String>>,
    pub consensus: ConsensusMechanism,
    pub quality: QualitySettings,
}

impl CollaborativeEcosystem {
    pub(crate) fn assemble(participants: &[&ProtocolOrganism]) -> Result<Self, DesignError> {
        if participants.len() < MIN_PARTICIPANTS {
            return Err(DesignError::TooFewParticipants(participants.len()));
        }

        let mut ids: Vec<String> = participants.iter().map(|p| p.organism_id.clone()).collect();
        ids.sort();
        let ecosystem_id = format!(
            "ecosystem_{}",
            short_hash(&sha256_hex(ids.join(",")), 8)
        );

        let mut topology = Vec::new();
        for (i, source) in participants.iter().enumerate() {
            for target in &participants[i + 1..] {
                let shared_interfaces = source
                    .collaboration_interfaces
                    .iter()
                    .filter(|iface| target.collaboration_interfaces.contains(iface))
                    .cloned()
                    .collect();
                topology.push(CollaborationChannel {
                    source: source.organism_id.clone(),
                    target: target.organism_id.clone(),
                    shared_interfaces,
                });
            }
        }

        let mut shared_gene_pool: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for organism in participants {
            for gene in &organism.gene_sequence {
                shared_gene_pool
                    .entry(gene.gene_id.clone())
                    .or_default()
                    .push(organism.organism_id.clone());
            }
        }

        let total_fitness: f64 = participants.iter().map(|p| p.fitness()).sum();
        let count = participants.len();
        let weights = participants
            .iter()
            .map(|p| {
                let weight = if total_fitness > 0.0 {
                    p.fitness() / total_fitness
                } else {
                    1.0 / count as f64
                };
                (p.organism_id.clone(), weight)
            })
            .collect();

        let min_fitness = participants
            .iter()
            .map(|p| p.fitness())
            .fold(f64::INFINITY, f64::min);

        Ok(Self {
            ecosystem_id,
            participants: participants.iter().map(|p| p.organism_id.clone()).collect(),
            topology,
            shared_gene_pool,
            consensus: ConsensusMechanism {
                model: "weighted_fitness_voting".to_string(),
                quorum: (2 * count).div_ceil(3),
                weights,
            },
            quality: QualitySettings {
                min_fitness,
                validation_required: true,
                conflict_resolution: "consensus_based".to_string(),
            },
        })
    }

    /// Gene ids carried by more than one participant
    pub fn common_genes(&self) -> impl Iterator<Item = &str> {
        self.shared_gene_pool
            .iter()
            .filter(|(_, carriers)| carriers.len() > 1)
            .map(|(gene, _)| gene.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol_design::IntrospectiveProtocolDesigner;

    const DESIGNER: &str = "meta_protocol_designer_v1";
    const EVOLUTION: &str = "meta_evolution_engine_v1";
    const COLLABORATION: &str = "meta_collaboration_v1";

    fn designer() -> IntrospectiveProtocolDesigner {
        let mut designer = IntrospectiveProtocolDesigner::new();
        designer.initialize_meta_protocol_system();
        designer
    }

    #[test]
    fn test_pairwise_topology() {
        let ecosystem = designer()
            .create_collaborative_protocol_ecosystem(&[DESIGNER, EVOLUTION, COLLABORATION])
            .unwrap();
        assert_eq!(ecosystem.participants.len(), 3);
        assert_eq!(ecosystem.topology.len(), 3);
        assert!(ecosystem.ecosystem_id.starts_with("ecosystem_"));
        assert_eq!(ecosystem.shared_gene_pool.len(), 10);
        assert_eq!(ecosystem.common_genes().count(), 0);
        assert_eq!(ecosystem.consensus.quorum, 2);
        assert_eq!(ecosystem.quality.min_fitness, 1.0);
    }

    #[test]
    fn test_id_ignores_participant_order() {
        let designer = designer();
        let a = designer
            .create_collaborative_protocol_ecosystem(&[DESIGNER, EVOLUTION])
            .unwrap();
        let b = designer
            .create_collaborative_protocol_ecosystem(&[EVOLUTION, DESIGNER])
            .unwrap();
        assert_eq!(a.ecosystem_id, b.ecosystem_id);
    }

    #[test]
    fn test_consensus_needs_quorum_and_weight() {
        let ecosystem = designer()
            .create_collaborative_protocol_ecosystem(&[DESIGNER, EVOLUTION, COLLABORATION])
            .unwrap();
        assert!(!ecosystem.consensus.approves(&[DESIGNER]));
        assert!(ecosystem.consensus.approves(&[DESIGNER, EVOLUTION]));
        assert!(!ecosystem.consensus.approves(&[DESIGNER, "outsider"]));
    }

    #[test]
    fn test_rejects_unknown_and_lonely_participants() {
        let designer = designer();
        assert_eq!(
            designer.create_collaborative_protocol_ecosystem(&[DESIGNER, "ghost"]),
            Err(DesignError::UnknownProtocol("ghost".into()))
        );
        assert_eq!(
            designer.create_collaborative_protocol_ecosystem(&[DESIGNER, DESIGNER]),
            Err(DesignError::TooFewParticipants(1))
        );
    }
}
