// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use serde_json::json;
    use std::sync::Arc;

    use crate::backends::stub::{FailingBackend, TamperingBackend};
    use crate::backends::ContentStoreBackend;
    use crate::build::{
        BuildConfig, BuildExecutor, BuildManifest, BuildProcedure, BuildStatus,
        ComponentOutcome, ReproducibleBuilder, SystemBlueprint,
    };
    use crate::config::load_system_specification;
    use crate::errors::FailureStrategy;

    fn demo_blueprint() -> SystemBlueprint {
        let spec = load_system_specification("configs/ai_system.yaml").unwrap();
        let mut builder = ReproducibleBuilder::new("/nix/store");
        builder
            .create_ai_system_blueprint("CognitiveAI_System", &spec)
            .unwrap()
    }

    fn store_executor(strategy: FailureStrategy) -> BuildExecutor {
        BuildExecutor::new(Arc::new(ContentStoreBackend::new("/nix/store")), 4, strategy)
    }

    /// a (fails) and b are independent; c needs b
    fn independent_failure_manifest() -> BuildManifest {
        let mut builder = ReproducibleBuilder::new("/nix/store");
        let outputs = |name: &str| BuildProcedure {
            outputs: vec![format!("{}.bin", name)],
            ..BuildProcedure::default()
        };
        builder
            .define_build_component("a", "1", &json!({"a": 1}), outputs("a"))
            .unwrap();
        builder
            .define_build_component("b", "1", &json!({"b": 1}), outputs("b"))
            .unwrap();
        let c_procedure = BuildProcedure {
            inputs: vec!["b".into()],
            ..outputs("c")
        };
        builder
            .define_build_component("c", "1", &json!({"c": 1}), c_procedure)
            .unwrap();
        builder
            .generate_build_manifest(
                &["a".to_string(), "c".to_string()],
                &BuildConfig::default(),
            )
            .unwrap()
    }

    fn outcome_for<'a>(
        report: &'a crate::build::BuildReport,
        name: &str,
    ) -> &'a ComponentOutcome {
        report
            .component_results
            .iter()
            .find(|(key, _)| key.starts_with(&format!("{}-", name)))
            .map(|(_, outcome)| outcome)
            .unwrap()
    }

    #[test]
    fn test_demo_system_blueprint_shape() {
        let blueprint = demo_blueprint();
        assert_eq!(blueprint.system_name, "CognitiveAI_System");
        assert_eq!(blueprint.components.len(), 5);

        let dev = &blueprint.build_manifests["development"];
        assert_eq!(dev.target_name, "dev_system");
        assert_eq!(dev.components.len(), 2);
        assert_eq!(dev.build_environment.base_image, "python:3.11-slim");
        assert!(dev.external_inputs.contains(&"python-pytorch".to_string()));

        let prod = &blueprint.build_manifests["production"];
        assert_eq!(prod.components.len(), 5);
        assert_eq!(
            prod.components.last().unwrap().name,
            "distributed_cognitive_architecture"
        );
    }

    #[test]
    fn test_demo_blueprint_is_reproducible() {
        let first = demo_blueprint();
        let second = demo_blueprint();
        for scenario in ["development", "production"] {
            assert_eq!(
                first.build_manifests[scenario].manifest_id,
                second.build_manifests[scenario].manifest_id
            );
        }
        assert_ne!(
            first.build_manifests["development"].manifest_id,
            first.build_manifests["production"].manifest_id
        );
    }

    #[tokio::test]
    async fn test_production_build_succeeds_and_verifies() {
        let blueprint = demo_blueprint();
        let manifest = &blueprint.build_manifests["production"];

        let report = store_executor(FailureStrategy::FailFast)
            .execute(manifest)
            .await
            .unwrap();

        assert_eq!(report.status, BuildStatus::Success);
        assert_eq!(report.component_results.len(), 5);
        // 3 model outputs x2, 4 protocol outputs x2, 4 architecture outputs
        assert_eq!(report.artifacts.len(), 18);
        let verification = report.verification.unwrap();
        assert!(verification.all_verified);
        assert!(verification.failed_verifications.is_empty());
        assert!(report.artifacts[0].starts_with("/nix/store"));
    }

    #[tokio::test]
    async fn test_same_manifest_builds_identical_artifacts() {
        let blueprint = demo_blueprint();
        let manifest = &blueprint.build_manifests["development"];
        let executor = store_executor(FailureStrategy::FailFast);

        let first = executor.execute(manifest).await.unwrap();
        let second = executor.execute(manifest).await.unwrap();
        assert_eq!(first.artifacts, second.artifacts);
        assert_eq!(first.environment_id, second.environment_id);
    }

    #[tokio::test]
    async fn test_fail_fast_skips_dependents_and_later_levels() {
        let manifest = independent_failure_manifest();
        let backend = Arc::new(FailingBackend::new(&["a"]));
        let executor = BuildExecutor::new(backend.clone(), 2, FailureStrategy::FailFast);

        let report = executor.execute(&manifest).await.unwrap();

        assert_eq!(report.status, BuildStatus::Failed);
        assert!(report.verification.is_none());
        assert!(matches!(outcome_for(&report, "a"), ComponentOutcome::Failed { .. }));
        assert!(matches!(outcome_for(&report, "b"), ComponentOutcome::Built(_)));
        assert!(matches!(outcome_for(&report, "c"), ComponentOutcome::Skipped { .. }));
        assert_eq!(backend.attempts(), 2);
    }

    #[tokio::test]
    async fn test_continue_on_error_builds_independent_components() {
        let manifest = independent_failure_manifest();
        let backend = Arc::new(FailingBackend::new(&["a"]));
        let executor = BuildExecutor::new(backend.clone(), 2, FailureStrategy::ContinueOnError);

        let report = executor.execute(&manifest).await.unwrap();

        assert_eq!(report.status, BuildStatus::Failed);
        assert!(matches!(outcome_for(&report, "c"), ComponentOutcome::Built(_)));
        assert_eq!(backend.attempts(), 3);
    }

    #[tokio::test]
    async fn test_continue_on_error_skips_downstream_of_failure() {
        let blueprint = demo_blueprint();
        let manifest = &blueprint.build_manifests["production"];
        let backend = Arc::new(FailingBackend::new(&["multimodal_vision_model"]));
        let executor = BuildExecutor::new(backend, 4, FailureStrategy::ContinueOnError);

        let report = executor.execute(manifest).await.unwrap();

        assert_eq!(report.status, BuildStatus::Failed);
        assert!(matches!(
            outcome_for(&report, "distributed_cognitive_architecture"),
            ComponentOutcome::Skipped { .. }
        ));
        assert!(matches!(
            outcome_for(&report, "transformer_language_model"),
            ComponentOutcome::Built(_)
        ));
    }

    #[tokio::test]
    async fn test_tampered_checksum_fails_verification() {
        let blueprint = demo_blueprint();
        let mut manifest = blueprint.build_manifests["development"].clone();
        let key = manifest.components[0].key();
        manifest
            .verification_checksums
            .insert(key.clone(), "f".repeat(64));

        let report = store_executor(FailureStrategy::FailFast)
            .execute(&manifest)
            .await
            .unwrap();

        assert_eq!(report.status, BuildStatus::VerificationFailed);
        let verification = report.verification.unwrap();
        assert_eq!(verification.failed_verifications, vec![key.clone()]);
        assert!(!verification.details[&key].checksum_verified);
    }

    #[tokio::test]
    async fn test_non_reproducible_outputs_fail_verification() {
        let blueprint = demo_blueprint();
        let manifest = &blueprint.build_manifests["development"];
        let executor = BuildExecutor::new(Arc::new(TamperingBackend), 2, FailureStrategy::FailFast);

        let report = executor.execute(manifest).await.unwrap();

        assert_eq!(report.status, BuildStatus::VerificationFailed);
        let verification = report.verification.unwrap();
        assert_eq!(verification.failed_verifications.len(), 2);
        assert!(verification.details.values().all(|d| d.checksum_verified));
    }
}
