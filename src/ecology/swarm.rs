// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::config::SwarmSettings;
use crate::ecology::ContextualMemoryPattern;

const INERTIA_WEIGHT: f64 = 0.7;
const COGNITIVE_WEIGHT: f64 = 1.4;
const SOCIAL_WEIGHT: f64 = 1.4;
const SALIENCE_WEIGHT: f64 = 0.3;
const SALIENCE_SCALE: f64 = 0.01;
const INITIAL_VELOCITY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    pub particles: usize,
    pub iterations: usize,
    pub dimensions: usize,
    pub seed: u64,
    /// Minimum global-best gain that counts as progress
    pub tolerance: f64,
    /// Consecutive stalled iterations before stopping; 0 disables early stop
    pub patience: usize,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::from(&SwarmSettings::default())
    }
}

impl From<&SwarmSettings> for SwarmConfig {
    fn from(settings: &SwarmSettings) -> Self {
        Self {
            particles: settings.particles,
            iterations: settings.iterations,
            dimensions: settings.dimensions,
            seed: settings.seed,
            tolerance: settings.tolerance,
            patience: settings.patience,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmOutcome {
    pub embedding: Vec<f64>,
    pub best_score: f64,
    pub iterations_run: usize,
    pub converged_early: bool,
}

struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best_position: Vec<f64>,
    best_score: f64,
}

/// Embedding dimension a priority key contributes to
pub fn dimension_for(key: &str, dimensions: usize) -> usize {
    let digest = Sha256::digest(key.as_bytes());
    let bucket = digest
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    (bucket % dimensions.max(1) as u64) as usize
}

/// Objective the swarm maximizes for one pattern.
///
/// `cosmos` rewards weight on the dimensions the priority profile maps to;
/// `coherence` rewards embeddings whose components sum close to the salience.
/// The product is scaled by `1 + maturity_bonus`.
struct Objective {
    weights: Vec<(usize, f64)>,
    salience: f64,
    scale: f64,
}

impl Objective {
    fn new(pattern: &ContextualMemoryPattern, dimensions: usize, maturity_bonus: f64) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (key, weight) in &pattern.priority_profile {
            *merged.entry(dimension_for(key, dimensions)).or_insert(0.0) += weight;
        }
        Self {
            weights: merged.into_iter().collect(),
            salience: pattern.salience_score,
            scale: 1.0 + maturity_bonus,
        }
    }

    fn score(&self, position: &[f64]) -> f64 {
        let cosmos: f64 = self
            .weights
            .iter()
            .map(|(dim, weight)| position[*dim] * weight)
            .sum();
        let total: f64 = position.iter().sum();
        let coherence = 1.0 / (1.0 + (total - self.salience).abs());
        cosmos * coherence * self.scale
    }
}

/// Seeded particle swarm optimizer for memory embeddings.
///
/// The same config and pattern always produce the same embedding. Every
/// component of the result lies in `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct ParticleSwarm {
    config: SwarmConfig,
}

impl ParticleSwarm {
    pub fn new(config: SwarmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn optimize(&self, pattern: &ContextualMemoryPattern) -> SwarmOutcome {
        self.optimize_with_bonus(pattern, 0.0)
    }

    /// Optimize with the objective scaled by `1 + maturity_bonus`, as done for
    /// patterns owned by a maturing city.
    pub fn optimize_with_bonus(
        &self,
        pattern: &ContextualMemoryPattern,
        maturity_bonus: f64,
    ) -> SwarmOutcome {
        let dims = self.config.dimensions;
        if dims == 0 {
            return SwarmOutcome {
                embedding: Vec::new(),
                best_score: 0.0,
                iterations_run: 0,
                converged_early: false,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let objective = Objective::new(pattern, dims, maturity_bonus);
        let drift = SALIENCE_WEIGHT * pattern.salience_score * SALIENCE_SCALE;

        let mut swarm: Vec<Particle> = (0..self.config.particles.max(1))
            .map(|_| {
                let position: Vec<f64> = (0..dims).map(|_| rng.gen_range(-1.0..=1.0)).collect();
                let velocity = (0..dims)
                    .map(|_| rng.gen_range(-INITIAL_VELOCITY..=INITIAL_VELOCITY))
                    .collect();
                Particle {
                    best_position: position.clone(),
                    position,
                    velocity,
                    best_score: f64::NEG_INFINITY,
                }
            })
            .collect();

        let mut global_best = swarm[0].position.clone();
        let mut global_score = f64::NEG_INFINITY;
        let mut stalled = 0;
        let mut iterations_run = 0;
        let mut converged_early = false;

        for _ in 0..self.config.iterations {
            iterations_run += 1;
            let previous = global_score;

            for particle in swarm.iter_mut() {
                let score = objective.score(&particle.position);
                if score > particle.best_score {
                    particle.best_score = score;
                    particle.best_position.clone_from(&particle.position);
                }
                if score > global_score {
                    global_score = score;
                    global_best.clone_from(&particle.position);
                }
            }

            if global_score - previous < self.config.tolerance {
                stalled += 1;
            } else {
                stalled = 0;
            }
            if self.config.patience > 0 && stalled >= self.config.patience {
                converged_early = true;
                break;
            }

            for particle in swarm.iter_mut() {
                for i in 0..dims {
                    let r1: f64 = rng.gen();
                    let r2: f64 = rng.gen();
                    let velocity = INERTIA_WEIGHT * particle.velocity[i]
                        + COGNITIVE_WEIGHT * r1 * (particle.best_position[i] - particle.position[i])
                        + SOCIAL_WEIGHT * r2 * (global_best[i] - particle.position[i])
                        + drift;
                    particle.velocity[i] = velocity;
                    particle.position[i] = (particle.position[i] + velocity).clamp(-1.0, 1.0);
                }
            }
        }

        SwarmOutcome {
            embedding: global_best,
            best_score: global_score,
            iterations_run,
            converged_early,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(profile: &[(&str, f64)]) -> ContextualMemoryPattern {
        ContextualMemoryPattern {
            pattern_id: "p".into(),
            priority_profile: profile.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            execution_trace: Vec::new(),
            embedding_vector: None,
            salience_score: 0.95,
            organization_context: "org".into(),
        }
    }

    fn small(seed: u64) -> SwarmConfig {
        SwarmConfig {
            particles: 6,
            iterations: 30,
            dimensions: 32,
            seed,
            tolerance: 1e-6,
            patience: 10,
        }
    }

    #[test]
    fn test_embedding_shape_and_bounds() {
        let outcome = ParticleSwarm::new(small(42))
            .optimize(&pattern(&[("ml_architecture", 0.9), ("protocol_design", 0.95)]));
        assert_eq!(outcome.embedding.len(), 32);
        assert!(outcome.embedding.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(outcome.best_score.is_finite());
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let p = pattern(&[("enterprise_ai", 0.85)]);
        let first = ParticleSwarm::new(small(7)).optimize(&p);
        let second = ParticleSwarm::new(small(7)).optimize(&p);
        assert_eq!(first, second);

        let other = ParticleSwarm::new(small(8)).optimize(&p);
        assert_ne!(first.embedding, other.embedding);
    }

    #[test]
    fn test_early_stop_respects_patience() {
        // an empty profile scores zero everywhere, so only the first iteration improves
        let config = SwarmConfig {
            patience: 3,
            ..small(1)
        };
        let outcome = ParticleSwarm::new(config).optimize(&pattern(&[]));
        assert!(outcome.converged_early);
        assert_eq!(outcome.iterations_run, 4);
    }

    #[test]
    fn test_zero_patience_runs_every_iteration() {
        let config = SwarmConfig {
            patience: 0,
            ..small(1)
        };
        let outcome = ParticleSwarm::new(config).optimize(&pattern(&[]));
        assert!(!outcome.converged_early);
        assert_eq!(outcome.iterations_run, 30);
    }

    #[test]
    fn test_maturity_bonus_scales_score() {
        let p = pattern(&[("cognitive_architecture", 0.9)]);
        let config = SwarmConfig {
            patience: 0,
            ..small(3)
        };
        let plain = ParticleSwarm::new(config.clone()).optimize(&p);
        let boosted = ParticleSwarm::new(config).optimize_with_bonus(&p, 0.5);

        assert_eq!(plain.embedding, boosted.embedding);
        assert!((boosted.best_score - plain.best_score * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_projection_is_stable() {
        let dim = dimension_for("protocol_design", 768);
        assert!(dim < 768);
        assert_eq!(dim, dimension_for("protocol_design", 768));
    }
}
