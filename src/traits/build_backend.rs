// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::build::{BuildComponent, BuildEnvironment, ComponentBuildResult, PreparedEnvironment};
use crate::errors::BuildError;

/// Something that can turn a manifest component into store artifacts.
///
/// The executor calls `prepare_environment` once per manifest and then
/// `build` for every component, concurrently within a topological level.
#[async_trait]
pub trait BuildBackend: Send + Sync {
    async fn prepare_environment(
        &self,
        environment: &BuildEnvironment,
    ) -> Result<PreparedEnvironment, BuildError>;

    /// Build one component. `checksum` is the component's manifest checksum.
    async fn build(
        &self,
        component: &BuildComponent,
        checksum: &str,
        environment: &PreparedEnvironment,
    ) -> Result<ComponentBuildResult, BuildError>;

    fn name(&self) -> &'static str;
}
