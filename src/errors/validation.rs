// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur while validating a build dependency graph
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected between build components
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
    /// A requested build target is not known to the registry
    UnresolvedTarget {
        /// The identifier that could not be resolved
        target: String,
    },
    /// A node lists an input that has no entry in the graph
    UnresolvedDependency {
        /// The component that has the unresolved input
        component: String,
        /// The input that couldn't be resolved
        missing_dependency: String,
    },
    /// A component key was registered twice with different content
    DuplicateComponent {
        /// The duplicate registry key
        key: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedTarget { target } => {
                write!(f, "Build target '{}' is not a registered component", target)
            }
            ValidationError::UnresolvedDependency {
                component,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Component '{}' depends on '{}' which is not in the graph",
                    component, missing_dependency
                )
            }
            ValidationError::DuplicateComponent { key } => {
                write!(f, "Duplicate component key: '{}'", key)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
