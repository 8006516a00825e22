// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backends::ContentStoreBackend;
use crate::build::{BuildComponent, BuildEnvironment, ComponentBuildResult, PreparedEnvironment};
use crate::errors::BuildError;
use crate::traits::BuildBackend;

/// Delegates to the store backend but fails for the named components
pub struct FailingBackend {
    inner: ContentStoreBackend,
    failing: BTreeSet<String>,
    pub attempts: AtomicUsize,
}

impl FailingBackend {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            inner: ContentStoreBackend::new("/test/store"),
            failing: failing.iter().map(|s| s.to_string()).collect(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BuildBackend for FailingBackend {
    async fn prepare_environment(
        &self,
        environment: &BuildEnvironment,
    ) -> Result<PreparedEnvironment, BuildError> {
        self.inner.prepare_environment(environment).await
    }

    async fn build(
        &self,
        component: &BuildComponent,
        checksum: &str,
        environment: &PreparedEnvironment,
    ) -> Result<ComponentBuildResult, BuildError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&component.name) {
            return Err(BuildError::ComponentFailed {
                component: component.name.clone(),
                reason: "simulated failure".into(),
            });
        }
        self.inner.build(component, checksum, environment).await
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Reports a wrong hash for every output, as a non-reproducible toolchain would
pub struct TamperingBackend;

#[async_trait]
impl BuildBackend for TamperingBackend {
    async fn prepare_environment(
        &self,
        environment: &BuildEnvironment,
    ) -> Result<PreparedEnvironment, BuildError> {
        Ok(PreparedEnvironment {
            env_id: "tampered".into(),
            environment: environment.clone(),
        })
    }

    async fn build(
        &self,
        component: &BuildComponent,
        _checksum: &str,
        _environment: &PreparedEnvironment,
    ) -> Result<ComponentBuildResult, BuildError> {
        Ok(ComponentBuildResult {
            component: component.key(),
            output_hashes: component
                .build_outputs
                .iter()
                .map(|o| (o.clone(), "0".repeat(64)))
                .collect(),
            artifacts: Vec::new(),
            build_time_ms: 0,
        })
    }

    fn name(&self) -> &'static str {
        "tampering"
    }
}
