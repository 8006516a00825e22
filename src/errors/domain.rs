// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("Unknown workbench type: {0}")]
    UnknownWorkbenchType(String),

    #[error("Unknown export format: {0}")]
    UnknownExportFormat(String),

    #[error("Failed to serialize blueprint as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize blueprint as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum EnterpriseError {
    #[error("Namespace '{0}' already exists")]
    NamespaceExists(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum TransportError {
    #[error("No neural channel established between {source_org} and {target_org}")]
    NoChannel { source_org: String, target_org: String },

    #[error("Priority {0} is out of range (expected 1-5)")]
    InvalidPriority(u8),

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Unknown channel type: {0}")]
    UnknownChannelType(String),

    #[error("Transmission over {channel_id} failed: {reason}")]
    TransmissionFailed { channel_id: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum DesignError {
    #[error("Protocol '{0}' is not registered in the ecosystem")]
    UnknownProtocol(String),

    #[error("Meta-protocol system has not been initialized")]
    NotInitialized,

    #[error("An ecosystem needs at least two participants, got {0}")]
    TooFewParticipants(usize),

    #[error("Design of '{organism_id}' failed validation: {}", .issues.join("; "))]
    InvalidDesign {
        organism_id: String,
        issues: Vec<String>,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum MlDepartmentError {
    #[error("No enterprise architecture pattern covers domain '{0}'")]
    NoArchitectureForDomain(String),
}
