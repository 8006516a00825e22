// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ecology::CognitiveCity;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportLink {
    pub bandwidth: f64,
    pub latency: f64,
    pub quality: f64,
}

impl Default for TransportLink {
    fn default() -> Self {
        Self {
            bandwidth: 1.0,
            latency: 0.1,
            quality: 0.95,
        }
    }
}

/// Activation carried from one city to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationTransfer {
    pub source: String,
    pub target: String,
    pub specialty: String,
    pub activation: f64,
}

pub fn link_key(source: &str, target: &str) -> String {
    format!("{}::{}", source, target)
}

/// Links between city namespaces, keyed `source::target`
#[derive(Debug, Clone, Default)]
pub struct NeuralTransportNetwork {
    links: BTreeMap<String, TransportLink>,
}

impl NeuralTransportNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// One link per transport channel the city declares
    pub fn establish_links(&mut self, city: &CognitiveCity) -> usize {
        for target in city.neural_transport_channels.values() {
            self.links
                .insert(link_key(&city.namespace, target), TransportLink::default());
        }
        city.neural_transport_channels.len()
    }

    pub fn link(&self, source: &str, target: &str) -> Option<&TransportLink> {
        self.links.get(&link_key(source, target))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Scale `activation` through every link leaving `source`
    pub fn propagate_activation(
        &self,
        source: &CognitiveCity,
        specialty: &str,
        activation: f64,
    ) -> Vec<ActivationTransfer> {
        source
            .neural_transport_channels
            .values()
            .filter_map(|target| {
                self.link(&source.namespace, target).map(|link| ActivationTransfer {
                    source: source.namespace.clone(),
                    target: target.clone(),
                    specialty: specialty.to_string(),
                    activation: activation * link.quality * link.bandwidth,
                })
            })
            .collect()
    }
}
