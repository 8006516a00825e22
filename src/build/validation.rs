// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation for build dependency graphs.
//!
//! A resolved graph has to pass two checks before a manifest can be produced:
//!
//! 1. **Reference Validation**: every input listed by a node is itself a node
//! 2. **Cycle Detection**: DFS with a recursion stack, reporting the cycle path
//!
//! Cycle detection only runs once references are clean, because it walks the
//! adjacency lists and needs every edge to land on a known node.
//!
//! ## Cycle Detection Algorithm
//! Uses **Depth-First Search (DFS) with recursion stack**:
//! - **Time Complexity**: O(V + E)
//! - **Space Complexity**: O(V) for visited set and recursion stack
//! - Nodes currently on the recursion path are "gray"; reaching a gray node
//!   again closes a cycle, and the path segment from that node is the cycle.
//!
//! # Example
//! ```rust
//! use cognitive_ecology::build::{validate_build_graph, BuildGraph};
//! use cognitive_ecology::errors::ValidationError;
//!
//! let mut graph = BuildGraph::new();
//! graph.add_node("app".into(), vec!["lib".into()]);
//! graph.add_node("lib".into(), vec!["app".into()]);
//!
//! match validate_build_graph(&graph) {
//!     Err(errors) => assert!(matches!(errors[0], ValidationError::CyclicDependency { .. })),
//!     Ok(()) => unreachable!(),
//! }
//! ```

use std::collections::HashSet;

use crate::build::BuildGraph;
use crate::errors::ValidationError;

/// Validates a resolved build graph for structural integrity.
///
/// Accumulates every unresolved reference before giving up, so a caller sees
/// all broken edges at once. Cycle detection is skipped when references fail.
pub fn validate_build_graph(graph: &BuildGraph) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(unresolved) = validate_input_references(graph) {
        errors.extend(unresolved);
    }

    if errors.is_empty() {
        if let Some(cycle) = find_cycle(graph) {
            errors.push(ValidationError::CyclicDependency { cycle });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that every input listed in the graph is itself a node.
fn validate_input_references(graph: &BuildGraph) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (node, inputs) in &graph.0 {
        for input in inputs {
            if !graph.contains(input) {
                errors.push(ValidationError::UnresolvedDependency {
                    component: node.clone(),
                    missing_dependency: input.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Find one cycle in the graph, if any.
///
/// Returns the path with the first node repeated at the end, e.g.
/// `[a, b, c, a]` for `a` needing `b`, `b` needing `c` and `c` needing `a`.
/// Edges to inputs that are not nodes are ignored.
pub fn find_cycle(graph: &BuildGraph) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for node in graph.keys() {
        if !visited.contains(node.as_str()) {
            if let Some(cycle) =
                dfs_cycle_detection(node, graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(cycle);
            }
        }
    }
    None
}

/// DFS with recursion stack tracking.
///
/// * `visited` - fully explored nodes (black)
/// * `rec_stack` - nodes on the current path (gray)
/// * `path` - current DFS path, used to extract the cycle
fn dfs_cycle_detection(
    node: &str,
    graph: &BuildGraph,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(inputs) = graph.inputs(node) {
        for input in inputs {
            if !graph.contains(input) {
                continue;
            }
            if !visited.contains(input.as_str()) {
                if let Some(cycle) = dfs_cycle_detection(input, graph, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(input.as_str()) {
                if let Some(cycle_start) = path.iter().position(|x| x == input) {
                    let mut cycle = path[cycle_start..].to_vec();
                    cycle.push(input.clone());
                    return Some(cycle);
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> BuildGraph {
        let mut g = BuildGraph::new();
        for (node, inputs) in edges {
            g.add_node(
                node.to_string(),
                inputs.iter().map(|s| s.to_string()).collect(),
            );
        }
        g
    }

    #[test]
    fn test_valid_empty_graph() {
        assert!(validate_build_graph(&BuildGraph::new()).is_ok());
    }

    #[test]
    fn test_valid_diamond() {
        let g = graph(&[("d", &["b", "c"]), ("b", &["a"]), ("c", &["a"]), ("a", &[])]);
        assert!(validate_build_graph(&g).is_ok());
    }

    #[test]
    fn test_unresolved_references_accumulate() {
        let g = graph(&[("a", &["x"]), ("b", &["y"])]);
        let errors = validate_build_graph(&g).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ValidationError::UnresolvedDependency {
                component: "a".into(),
                missing_dependency: "x".into(),
            }
        );
    }

    #[test]
    fn test_self_dependency_cycle() {
        let g = graph(&[("a", &["a"])]);
        let errors = validate_build_graph(&g).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicDependency {
                cycle: vec!["a".into(), "a".into()]
            }]
        );
    }

    #[test]
    fn test_complex_cycle_path() {
        // a -> b -> c -> d -> b
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["b"])]);
        let cycle = find_cycle(&g).unwrap();
        assert_eq!(cycle, vec!["b", "c", "d", "b"]);
    }

    #[test]
    fn test_cycle_error_message() {
        let g = graph(&[("x", &["y"]), ("y", &["x"])]);
        let errors = validate_build_graph(&g).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "Cyclic dependency detected: x -> y -> x"
        );
    }
}
