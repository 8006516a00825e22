// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ValidationError;

/// How the build executor reacts when a component fails to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Stop after the level in which the first failure happened
    #[default]
    FailFast,
    /// Keep building, skipping every component downstream of a failure
    ContinueOnError,
}

/// Errors produced by the reproducible build system
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Build graph validation failed: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error("Failed to serialize build data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Component '{component}' failed to build: {reason}")]
    ComponentFailed { component: String, reason: String },

    #[error("Component '{0}' is not part of the manifest")]
    ComponentNotFound(String),

    #[error("Build scenario '{0}' is not defined")]
    UnknownScenario(String),

    #[error("Internal build error: {message}")]
    Internal { message: String },
}

impl From<ValidationError> for BuildError {
    fn from(error: ValidationError) -> Self {
        BuildError::Validation(vec![error])
    }
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
