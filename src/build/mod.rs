// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reproducible build system for AI components.
//!
//! Components (models, protocols, cognitive architectures) are pinned to the
//! hash of their source specification and registered in a
//! [`ReproducibleBuilder`]. A manifest resolves the dependency graph of a set
//! of targets, orders it topologically and records checksums; the
//! [`BuildExecutor`] then builds it level by level through a
//! [`BuildBackend`](crate::traits::BuildBackend) and verifies the outputs.

mod builder;
mod component;
mod executor;
mod graph;
mod manifest;
mod system;
mod validation;

#[cfg(test)]
mod integration_tests;

pub use builder::{ReproducibleBuilder, ResolvedGraph};
pub use component::{BuildComponent, BuildProcedure, BuildSystem};
pub use executor::{
    expected_output_hash, verify_build_outputs, BuildExecutor, BuildReport, BuildStatus,
    ComponentBuildResult, ComponentOutcome, PreparedEnvironment, VerificationDetail,
    VerificationReport,
};
pub use graph::BuildGraph;
pub use manifest::{compute_verification_checksums, BuildConfig, BuildEnvironment, BuildManifest};
pub use system::{
    architecture_key, model_key, protocol_key, ArchitectureSpec, BenchmarkSuites, ModelSpec,
    ProtocolSpec, SystemBlueprint, SystemSpecification,
};
pub use validation::{find_cycle, validate_build_graph};
