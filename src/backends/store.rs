// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::build::{
    expected_output_hash, BuildComponent, BuildEnvironment, ComponentBuildResult,
    PreparedEnvironment,
};
use crate::errors::BuildError;
use crate::traits::BuildBackend;
use crate::utils::{canonical_hash, short_hash};

/// Deterministic backend that maps every output to a path in a content-addressed store.
///
/// Output hashes are derived from the component checksum, so two builds of the
/// same manifest always report the same artifacts. Nothing is written to disk.
#[derive(Debug, Clone)]
pub struct ContentStoreBackend {
    store_path: PathBuf,
}

impl ContentStoreBackend {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    /// `<store>/<first 32 hash chars>-<output>`
    pub fn artifact_path(&self, output_hash: &str, output: &str) -> PathBuf {
        self.store_path
            .join(format!("{}-{}", short_hash(output_hash, 32), output))
    }
}

#[async_trait]
impl BuildBackend for ContentStoreBackend {
    async fn prepare_environment(
        &self,
        environment: &BuildEnvironment,
    ) -> Result<PreparedEnvironment, BuildError> {
        let digest = canonical_hash(environment)?;
        Ok(PreparedEnvironment {
            env_id: format!("build_env_{}", short_hash(&digest, 12)),
            environment: environment.clone(),
        })
    }

    async fn build(
        &self,
        component: &BuildComponent,
        checksum: &str,
        _environment: &PreparedEnvironment,
    ) -> Result<ComponentBuildResult, BuildError> {
        let started = Instant::now();
        let mut output_hashes = BTreeMap::new();
        let mut artifacts = Vec::with_capacity(component.build_outputs.len());

        for output in &component.build_outputs {
            let hash = expected_output_hash(checksum, output);
            artifacts.push(self.artifact_path(&hash, output));
            output_hashes.insert(output.clone(), hash);
        }

        tracing::debug!(
            component = %component.key(),
            outputs = artifacts.len(),
            "derived store artifacts"
        );

        Ok(ComponentBuildResult {
            component: component.key(),
            output_hashes,
            artifacts,
            build_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "content_store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildConfig, BuildProcedure};

    #[tokio::test]
    async fn test_artifacts_live_in_store() {
        let backend = ContentStoreBackend::new("/gnu/store");
        let component = BuildComponent::from_procedure(
            "proto",
            "1.0.0",
            "feedface".repeat(8),
            BuildProcedure {
                outputs: vec!["proto_server.py".into()],
                ..BuildProcedure::default()
            },
        );
        let env = backend
            .prepare_environment(&BuildEnvironment::from(&BuildConfig::default()))
            .await
            .unwrap();
        assert!(env.env_id.starts_with("build_env_"));

        let result = backend.build(&component, "abc", &env).await.unwrap();
        let hash = expected_output_hash("abc", "proto_server.py");
        assert_eq!(result.output_hashes["proto_server.py"], hash);
        assert_eq!(
            result.artifacts[0],
            PathBuf::from(format!("/gnu/store/{}-proto_server.py", &hash[..32]))
        );
    }
}
