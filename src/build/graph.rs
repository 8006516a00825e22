// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::build::validation::find_cycle;
use crate::errors::ValidationError;

/// Newtype wrapper for a build dependency graph.
///
/// Each key is a node (a registered component key or an external input name)
/// and its value lists the inputs that node needs before it can be built.
/// A `BTreeMap` keeps iteration, serialization and hashing order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildGraph(pub BTreeMap<String, Vec<String>>);

impl BuildGraph {
    /// Create a new empty build graph
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a node together with the inputs it consumes
    pub fn add_node(&mut self, node: String, inputs: Vec<String>) {
        self.0.insert(node, inputs);
    }

    /// Get the inputs of a node
    pub fn inputs(&self, node: &str) -> Option<&Vec<String>> {
        self.0.get(node)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.0.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get all node ids in the graph
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Build the forward map (input -> [nodes that consume it]).
    ///
    /// Every node appears as a key, even when nothing depends on it. Inputs that
    /// are not nodes of the graph are ignored.
    pub fn build_dependents(&self) -> BTreeMap<String, Vec<String>> {
        let mut dependents: BTreeMap<String, Vec<String>> =
            self.0.keys().map(|k| (k.clone(), Vec::new())).collect();

        for (node, inputs) in &self.0 {
            for input in inputs {
                if let Some(list) = dependents.get_mut(input) {
                    list.push(node.clone());
                }
            }
        }
        dependents
    }

    /// Restrict the graph to `nodes`, dropping edges to anything outside the set.
    pub fn subgraph<'a, I>(&self, nodes: I) -> BuildGraph
    where
        I: IntoIterator<Item = &'a String>,
    {
        let keep: BTreeSet<&String> = nodes.into_iter().collect();
        let mut sub = BuildGraph::new();
        for (node, inputs) in &self.0 {
            if keep.contains(node) {
                let kept_inputs = inputs
                    .iter()
                    .filter(|i| keep.contains(i))
                    .cloned()
                    .collect();
                sub.add_node(node.clone(), kept_inputs);
            }
        }
        sub
    }

    /// Every node transitively downstream of `node` (not including `node` itself)
    pub fn downstream_of(&self, node: &str) -> BTreeSet<String> {
        let dependents = self.build_dependents();
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([node]);

        while let Some(current) = queue.pop_front() {
            if let Some(children) = dependents.get(current) {
                for child in children {
                    if seen.insert(child.clone()) {
                        queue.push_back(child);
                    }
                }
            }
        }
        seen
    }

    /// Compute topological levels with Kahn's algorithm.
    ///
    /// - Level 0: nodes with no inputs inside the graph
    /// - Level N: nodes whose inputs all sit in levels 0..N-1
    ///
    /// Nodes inside a level are sorted, so the result is deterministic. Inputs
    /// that are not nodes of the graph count as already satisfied.
    ///
    /// # Errors
    /// Returns `ValidationError::CyclicDependency` with the offending path when
    /// some nodes can never reach in-degree zero.
    pub fn levels(&self) -> Result<Vec<Vec<String>>, ValidationError> {
        let dependents = self.build_dependents();

        let mut in_degree: BTreeMap<&String, usize> = BTreeMap::new();
        for (node, inputs) in &self.0 {
            let degree = inputs.iter().filter(|i| self.0.contains_key(*i)).count();
            in_degree.insert(node, degree);
        }

        let mut current: Vec<String> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| (*node).clone())
            .collect();

        let mut levels = Vec::new();
        let mut processed = 0usize;

        while !current.is_empty() {
            processed += current.len();
            let mut next = BTreeSet::new();

            for node in &current {
                let Some(children) = dependents.get(node) else {
                    continue;
                };
                for child in children {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            next.insert(child.clone());
                        }
                    }
                }
            }

            levels.push(current);
            current = next.into_iter().collect();
        }

        if processed != self.0.len() {
            let cycle = find_cycle(self).unwrap_or_default();
            return Err(ValidationError::CyclicDependency { cycle });
        }

        Ok(levels)
    }

    /// Flattened build order: every node appears after all of its inputs.
    pub fn topological_order(&self) -> Result<Vec<String>, ValidationError> {
        Ok(self.levels()?.into_iter().flatten().collect())
    }
}

impl From<BTreeMap<String, Vec<String>>> for BuildGraph {
    fn from(graph: BTreeMap<String, Vec<String>>) -> Self {
        Self(graph)
    }
}

impl From<BuildGraph> for BTreeMap<String, Vec<String>> {
    fn from(graph: BuildGraph) -> Self {
        graph.0
    }
}
