// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the reproducible build system.
//!
//! This module contains message types for logging events related to:
//! * Component registration
//! * Manifest generation
//! * Build execution lifecycle (start, component failure, completion)

use crate::build::BuildStatus;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A component was added to the registry.
///
/// # Log Level
/// `debug!` - Registration happens for every component of every system
pub struct ComponentRegistered<'a> {
    pub key: &'a str,
    pub build_system: &'a str,
    pub input_count: usize,
}

impl Display for ComponentRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered component '{}' ({} build system, {} inputs)",
            self.key, self.build_system, self.input_count
        )
    }
}

impl StructuredLog for ComponentRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            component = self.key,
            build_system = self.build_system,
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "component_registered",
            span_name = name,
            component = self.key,
            build_system = self.build_system,
        )
    }
}

/// A build manifest was generated.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use cognitive_ecology::observability::messages::build::ManifestGenerated;
///
/// let msg = ManifestGenerated {
///     manifest_id: "9c1e",
///     target_name: "prod_system",
///     component_count: 5,
///     external_input_count: 13,
/// };
///
/// assert!(msg.to_string().contains("prod_system"));
/// ```
pub struct ManifestGenerated<'a> {
    pub manifest_id: &'a str,
    pub target_name: &'a str,
    pub component_count: usize,
    pub external_input_count: usize,
}

impl Display for ManifestGenerated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Generated manifest {} for '{}': {} components, {} external inputs",
            self.manifest_id, self.target_name, self.component_count, self.external_input_count
        )
    }
}

impl StructuredLog for ManifestGenerated<'_> {
    fn log(&self) {
        tracing::info!(
            manifest_id = self.manifest_id,
            target_name = self.target_name,
            component_count = self.component_count,
            external_input_count = self.external_input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "manifest",
            span_name = name,
            manifest_id = self.manifest_id,
            target_name = self.target_name,
        )
    }
}

/// Build execution started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BuildStarted<'a> {
    pub manifest_id: &'a str,
    pub backend: &'a str,
    pub component_count: usize,
    pub max_concurrency: usize,
}

impl Display for BuildStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting build of manifest {} with {} backend: {} components, max_concurrency={}",
            self.manifest_id, self.backend, self.component_count, self.max_concurrency
        )
    }
}

impl StructuredLog for BuildStarted<'_> {
    fn log(&self) {
        tracing::info!(
            manifest_id = self.manifest_id,
            backend = self.backend,
            component_count = self.component_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "build",
            span_name = name,
            manifest_id = self.manifest_id,
            backend = self.backend,
            component_count = self.component_count,
        )
    }
}

/// A component failed to build.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ComponentBuildFailed<'a> {
    pub component: &'a str,
    pub reason: &'a str,
}

impl Display for ComponentBuildFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Component '{}' failed to build: {}", self.component, self.reason)
    }
}

impl StructuredLog for ComponentBuildFailed<'_> {
    fn log(&self) {
        tracing::error!(component = self.component, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("component_failed", span_name = name, component = self.component)
    }
}

/// Build execution finished, successfully or not.
///
/// # Log Level
/// `info!` on success, `warn!` otherwise
pub struct BuildCompleted<'a> {
    pub manifest_id: &'a str,
    pub status: BuildStatus,
    pub duration: std::time::Duration,
}

impl Display for BuildCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Build of manifest {} finished with status {} in {:?}",
            self.manifest_id, self.status, self.duration
        )
    }
}

impl StructuredLog for BuildCompleted<'_> {
    fn log(&self) {
        let duration_ms = self.duration.as_millis() as u64;
        if self.status == BuildStatus::Success {
            tracing::info!(
                manifest_id = self.manifest_id,
                status = self.status.as_str(),
                duration_ms,
                "{}", self
            );
        } else {
            tracing::warn!(
                manifest_id = self.manifest_id,
                status = self.status.as_str(),
                duration_ms,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "build_completed",
            span_name = name,
            manifest_id = self.manifest_id,
            status = self.status.as_str(),
            duration = ?self.duration,
        )
    }
}
