// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cognitive cities and progressive memory encoding.
//!
//! * [`ParticleSwarm`] - seeded PSO that turns a memory pattern into a bounded embedding
//! * [`NeuralTransportNetwork`] - links between city namespaces and activation propagation
//! * [`OperationalizedRagFabric`] - ties the two together around registered cities
//! * [`CognitiveForge`] - grows one city through its forge phases with a maturity-weighted swarm

mod fabric;
mod forge;
mod memory;
mod network;
mod swarm;

pub use fabric::OperationalizedRagFabric;
pub use forge::{CognitiveForge, ForgeReport, FORGE_NAMESPACE};
pub use memory::{CognitiveCity, ContextualMemoryPattern};
pub use network::{link_key, ActivationTransfer, NeuralTransportNetwork, TransportLink};
pub use swarm::{dimension_for, ParticleSwarm, SwarmConfig, SwarmOutcome};
