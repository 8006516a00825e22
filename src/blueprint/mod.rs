// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guix-style reproducible blueprints for AI workbench environments.
//!
//! A [`BlueprintGenerator`] turns a [`WorkbenchType`] plus optional
//! [`EnterpriseConfig`] overrides into a [`BuildBlueprint`]: a pinned package
//! set, Dockerfile-like build instructions, test and benchmark commands, a
//! deployment profile, and a hash manifest that lets anyone check that a
//! blueprint was not altered after generation.
//!
//! ```rust
//! use cognitive_ecology::blueprint::{
//!     validate_reproducibility, BlueprintGenerator, EnterpriseConfig, WorkbenchType,
//! };
//!
//! let mut generator = BlueprintGenerator::new();
//! let blueprint = generator
//!     .create_ai_workbench_blueprint(WorkbenchType::ProtocolDesign, &EnterpriseConfig::default())
//!     .unwrap();
//!
//! assert_eq!(blueprint.version, "1.0");
//! assert!(validate_reproducibility(&blueprint).build_deterministic);
//! ```

mod environments;
mod generator;
mod spec;

pub use environments::environment_for;
pub use generator::{
    build_instructions, export_blueprint, hash_manifest, validate_reproducibility,
    BlueprintGenerator,
};
pub use spec::{
    BlueprintMetadata, BuildBlueprint, DeploymentConfig, EnterpriseConfig, EnvironmentSpec,
    ExportFormat, NetworkingConfig, PackageSpec, ReproducibilityReport, ScalingConfig,
    SecurityConfig, ServiceSpec, WorkbenchType,
};
