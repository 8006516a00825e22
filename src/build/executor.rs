// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::backends::ContentStoreBackend;
use crate::build::{BuildComponent, BuildEnvironment, BuildManifest};
use crate::config::BuilderConfig;
use crate::errors::{BuildError, FailureStrategy};
use crate::observability::messages::build::{
    BuildCompleted, BuildStarted, ComponentBuildFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::BuildBackend;
use crate::utils::{canonical_hash, sha256_hex};

/// Environment handle returned by a backend once isolation is set up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedEnvironment {
    pub env_id: String,
    pub environment: BuildEnvironment,
}

/// What a backend produced for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBuildResult {
    pub component: String,
    /// Output name -> content hash
    pub output_hashes: BTreeMap<String, String>,
    pub artifacts: Vec<PathBuf>,
    pub build_time_ms: u64,
}

/// Per-component result of a build run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComponentOutcome {
    Built(ComponentBuildResult),
    Failed { reason: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Success,
    Failed,
    VerificationFailed,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Success => "success",
            BuildStatus::Failed => "failed",
            BuildStatus::VerificationFailed => "verification_failed",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDetail {
    pub expected_checksum: Option<String>,
    pub actual_checksum: String,
    pub checksum_verified: bool,
    pub outputs_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub all_verified: bool,
    pub details: BTreeMap<String, VerificationDetail>,
    pub failed_verifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub manifest_id: String,
    pub status: BuildStatus,
    pub environment_id: String,
    pub component_results: BTreeMap<String, ComponentOutcome>,
    /// Absent when the build failed before verification
    pub verification: Option<VerificationReport>,
    pub artifacts: Vec<PathBuf>,
    pub log: Vec<String>,
    pub duration_ms: u64,
}

/// Hash every correct build of `output` must produce for a component with `checksum`
pub fn expected_output_hash(checksum: &str, output: &str) -> String {
    sha256_hex(format!("{}:{}", checksum, output))
}

/// Level-by-level executor for build manifests.
///
/// Components are grouped into topological levels from the manifest's
/// dependency graph; every level runs concurrently (bounded by a semaphore)
/// and the next level starts only when the current one is finished.
///
/// ## Failure Handling
/// - `FailFast`: the remaining levels are skipped once a level has a failure
/// - `ContinueOnError`: everything downstream of a failure is skipped, all
///   independent components are still built
///
/// Verification runs only when every component built. It recomputes each
/// component checksum and checks every reported output hash.
pub struct BuildExecutor {
    backend: Arc<dyn BuildBackend>,
    max_concurrency: usize,
    failure_strategy: FailureStrategy,
}

impl BuildExecutor {
    pub fn new(
        backend: Arc<dyn BuildBackend>,
        max_concurrency: usize,
        failure_strategy: FailureStrategy,
    ) -> Self {
        Self {
            backend,
            max_concurrency: max_concurrency.max(1),
            failure_strategy,
        }
    }

    /// Executor backed by the content-addressed store named in the config
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(
            Arc::new(ContentStoreBackend::new(config.store_path.clone())),
            config.effective_concurrency(),
            config.failure_strategy,
        )
    }

    pub async fn execute(&self, manifest: &BuildManifest) -> Result<BuildReport, BuildError> {
        let started = Instant::now();
        BuildStarted {
            manifest_id: &manifest.manifest_id,
            backend: self.backend.name(),
            component_count: manifest.components.len(),
            max_concurrency: self.max_concurrency,
        }
        .log();

        let environment = Arc::new(
            self.backend
                .prepare_environment(&manifest.build_environment)
                .await?,
        );

        let components: HashMap<String, Arc<BuildComponent>> = manifest
            .components
            .iter()
            .map(|c| (c.key(), Arc::new(c.clone())))
            .collect();

        let keys = manifest.component_keys();
        let mut graph = manifest.dependency_graph.subgraph(keys.iter());
        for key in &keys {
            if !graph.contains(key) {
                graph.add_node(key.clone(), Vec::new());
            }
        }
        let levels = graph.levels()?;

        let mut results = BTreeMap::new();
        let mut log = vec![format!("environment {} ready", environment.env_id)];
        let mut blocked = BTreeSet::new();
        let mut halted = false;

        for (index, level) in levels.iter().enumerate() {
            if halted {
                for key in level {
                    log.push(format!("level {}: skipped {} (build halted)", index, key));
                    results.insert(
                        key.clone(),
                        ComponentOutcome::Skipped {
                            reason: "build halted after an earlier failure".into(),
                        },
                    );
                }
                continue;
            }

            let mut runnable = Vec::with_capacity(level.len());
            for key in level {
                if blocked.contains(key) {
                    log.push(format!("level {}: skipped {} (upstream failure)", index, key));
                    results.insert(
                        key.clone(),
                        ComponentOutcome::Skipped {
                            reason: "an upstream component failed".into(),
                        },
                    );
                } else {
                    runnable.push(key.clone());
                }
            }

            let outcomes = self
                .execute_level(&runnable, &components, manifest, &environment)
                .await?;

            let mut level_failed = false;
            for (key, outcome) in outcomes {
                match &outcome {
                    ComponentOutcome::Built(result) => log.push(format!(
                        "level {}: built {} ({} artifacts)",
                        index,
                        key,
                        result.artifacts.len()
                    )),
                    ComponentOutcome::Failed { reason } => {
                        level_failed = true;
                        ComponentBuildFailed {
                            component: &key,
                            reason,
                        }
                        .log();
                        log.push(format!("level {}: failed {}: {}", index, key, reason));
                        blocked.extend(graph.downstream_of(&key));
                    }
                    ComponentOutcome::Skipped { .. } => {}
                }
                results.insert(key, outcome);
            }

            if level_failed && self.failure_strategy == FailureStrategy::FailFast {
                halted = true;
            }
        }

        let any_failed = results
            .values()
            .any(|o| matches!(o, ComponentOutcome::Failed { .. }));

        let (status, verification) = if any_failed {
            (BuildStatus::Failed, None)
        } else {
            let report = verify_build_outputs(manifest, &results)?;
            let status = if report.all_verified {
                BuildStatus::Success
            } else {
                BuildStatus::VerificationFailed
            };
            (status, Some(report))
        };

        let artifacts = results
            .values()
            .filter_map(|o| match o {
                ComponentOutcome::Built(result) => Some(result.artifacts.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect();

        let duration = started.elapsed();
        BuildCompleted {
            manifest_id: &manifest.manifest_id,
            status,
            duration,
        }
        .log();

        Ok(BuildReport {
            manifest_id: manifest.manifest_id.clone(),
            status,
            environment_id: environment.env_id.clone(),
            component_results: results,
            verification,
            artifacts,
            log,
            duration_ms: duration.as_millis() as u64,
        })
    }

    /// Build every component in `level` concurrently, returning outcomes in level order.
    async fn execute_level(
        &self,
        level: &[String],
        components: &HashMap<String, Arc<BuildComponent>>,
        manifest: &BuildManifest,
        environment: &Arc<PreparedEnvironment>,
    ) -> Result<Vec<(String, ComponentOutcome)>, BuildError> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = Vec::with_capacity(level.len());

        for key in level {
            let component = components
                .get(key)
                .cloned()
                .ok_or_else(|| BuildError::ComponentNotFound(key.clone()))?;
            let checksum = manifest.verification_checksums.get(key).cloned();
            let backend = self.backend.clone();
            let environment = environment.clone();
            let semaphore = semaphore.clone();
            let key = key.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| BuildError::Internal {
                        message: format!(
                            "Failed to acquire semaphore permit for component '{}': {}",
                            key, e
                        ),
                    })?;

                let outcome = match checksum {
                    None => ComponentOutcome::Failed {
                        reason: "manifest has no verification checksum for this component".into(),
                    },
                    Some(checksum) => {
                        match backend.build(&component, &checksum, &environment).await {
                            Ok(result) => ComponentOutcome::Built(result),
                            Err(e) => ComponentOutcome::Failed {
                                reason: e.to_string(),
                            },
                        }
                    }
                };
                Ok::<_, BuildError>((key, outcome))
            }));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            let outcome = task.await.map_err(|join_error| BuildError::Internal {
                message: format!("Task join error: {}", join_error),
            })??;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

/// Recompute component checksums and compare reported output hashes against them
pub fn verify_build_outputs(
    manifest: &BuildManifest,
    results: &BTreeMap<String, ComponentOutcome>,
) -> Result<VerificationReport, BuildError> {
    let mut details = BTreeMap::new();
    let mut failed = Vec::new();

    for component in &manifest.components {
        let key = component.key();
        let actual = canonical_hash(component)?;
        let expected = manifest.verification_checksums.get(&key).cloned();
        let checksum_verified = expected.as_deref() == Some(actual.as_str());

        let outputs_verified = match results.get(&key) {
            Some(ComponentOutcome::Built(result)) => component.build_outputs.iter().all(|output| {
                result.output_hashes.get(output) == Some(&expected_output_hash(&actual, output))
            }),
            _ => false,
        };

        if !(checksum_verified && outputs_verified) {
            failed.push(key.clone());
        }
        details.insert(
            key,
            VerificationDetail {
                expected_checksum: expected,
                actual_checksum: actual,
                checksum_verified,
                outputs_verified,
            },
        );
    }

    Ok(VerificationReport {
        all_verified: failed.is_empty(),
        details,
        failed_verifications: failed,
    })
}
