// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::errors::MlDepartmentError;
use crate::ml_department::patterns::{
    enterprise_transformer, multimodal_code_understanding, optimization_potential,
    KNOWN_CODEBASE_PATTERNS,
};
use crate::ml_department::{EnterpriseMlPattern, ModelSpecialization};

const STRICT_LATENCY_MS: u64 = 100;
const ISSUE_PENALTY: f64 = 0.05;
const DEFAULT_FREQUENCY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnterpriseRequirements {
    pub max_latency_ms: Option<u64>,
    pub data_privacy: bool,
}

/// What is known about a codebase before analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodebaseContext {
    pub codebase_features: Vec<String>,
    pub pattern_frequencies: BTreeMap<String, f64>,
    pub enterprise_requirements: EnterpriseRequirements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPattern {
    pub pattern_name: String,
    pub frequency: f64,
    pub enterprise_compliance: bool,
    pub optimization_potential: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOpportunity {
    #[serde(rename = "type")]
    pub kind: String,
    pub pattern: String,
    pub recommendation: String,
    pub expected_improvement: String,
    pub implementation_complexity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub security_compliance: bool,
    pub performance_compliance: bool,
    pub data_governance_compliance: bool,
    pub compliance_issues: Vec<ComplianceIssue>,
    pub compliance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodebaseAnalysis {
    pub identified_patterns: Vec<IdentifiedPattern>,
    pub optimization_opportunities: Vec<OptimizationOpportunity>,
    pub enterprise_compliance: ComplianceAssessment,
    pub performance_recommendations: Vec<String>,
    pub natural_language_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConstraints {
    pub on_premise_only: bool,
    pub low_latency_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectureRequirements {
    pub domain: String,
    pub performance_targets: BTreeMap<String, f64>,
    pub constraints: DeploymentConstraints,
}

impl Default for ArchitectureRequirements {
    fn default() -> Self {
        Self {
            domain: "general".to_string(),
            performance_targets: BTreeMap::new(),
            constraints: DeploymentConstraints::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentType {
    /// Cloud plus edge
    Hybrid,
    OnPremise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringPlan {
    pub performance_metrics: Vec<String>,
    pub business_metrics: Vec<String>,
    pub compliance_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStrategy {
    pub deployment_type: DeploymentType,
    pub scaling_strategy: String,
    pub monitoring: MonitoringPlan,
    pub rollout_plan: Vec<String>,
    pub edge_deployment: bool,
}

impl From<&DeploymentConstraints> for DeploymentStrategy {
    fn from(constraints: &DeploymentConstraints) -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            deployment_type: if constraints.on_premise_only {
                DeploymentType::OnPremise
            } else {
                DeploymentType::Hybrid
            },
            scaling_strategy: "auto_scaling".to_string(),
            monitoring: MonitoringPlan {
                performance_metrics: strings(&["latency", "throughput", "accuracy"]),
                business_metrics: strings(&["user_satisfaction", "productivity_gain"]),
                compliance_metrics: strings(&["privacy_score", "security_score"]),
            },
            rollout_plan: strings(&[
                "pilot_deployment",
                "gradual_rollout",
                "full_deployment",
                "optimization_phase",
            ]),
            edge_deployment: constraints.low_latency_required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureRecommendation {
    pub recommended_architecture: EnterpriseMlPattern,
    pub model_specifications: Vec<ModelSpecialization>,
    pub deployment_strategy: DeploymentStrategy,
    /// Pattern characteristic next to the requested target, for every target the pattern scores
    pub performance_projections: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentKnowledge {
    pub department: String,
    pub specializations: Vec<String>,
    pub patterns: BTreeMap<String, EnterpriseMlPattern>,
    pub model_registry: BTreeMap<String, ModelSpecialization>,
    pub performance_baselines: BTreeMap<String, f64>,
    pub enterprise_context: Map<String, Value>,
    pub natural_language_interface: bool,
    pub export_timestamp: DateTime<Utc>,
}

/// The enterprise ML department: pattern library, codebase analysis and
/// architecture recommendations.
#[derive(Debug, Clone)]
pub struct MlDepartment {
    enterprise_context: Map<String, Value>,
    specialized_patterns: BTreeMap<String, EnterpriseMlPattern>,
    model_registry: BTreeMap<String, ModelSpecialization>,
    performance_baselines: BTreeMap<String, f64>,
}

impl Default for MlDepartment {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl MlDepartment {
    pub fn new(enterprise_context: Map<String, Value>) -> Self {
        let specialized_patterns = [
            ("enterprise_transformer", enterprise_transformer()),
            ("multimodal_code_understanding", multimodal_code_understanding()),
        ]
        .into_iter()
        .map(|(key, pattern)| (key.to_string(), pattern))
        .collect();

        Self {
            enterprise_context,
            specialized_patterns,
            model_registry: BTreeMap::new(),
            performance_baselines: BTreeMap::new(),
        }
    }

    pub fn patterns(&self) -> &BTreeMap<String, EnterpriseMlPattern> {
        &self.specialized_patterns
    }

    pub fn model_registry(&self) -> &BTreeMap<String, ModelSpecialization> {
        &self.model_registry
    }

    /// Recognize known patterns, look for optimizations and check compliance.
    ///
    /// Frequencies of recognized patterns are kept as performance baselines.
    pub fn analyze_enterprise_codebase(&mut self, context: &CodebaseContext) -> CodebaseAnalysis {
        let identified_patterns: Vec<IdentifiedPattern> = KNOWN_CODEBASE_PATTERNS
            .iter()
            .filter(|p| context.codebase_features.iter().any(|f| f == *p))
            .map(|p| IdentifiedPattern {
                pattern_name: p.to_string(),
                frequency: context
                    .pattern_frequencies
                    .get(*p)
                    .copied()
                    .unwrap_or(DEFAULT_FREQUENCY),
                enterprise_compliance: true,
                optimization_potential: optimization_potential(p),
            })
            .collect();

        for pattern in &identified_patterns {
            self.performance_baselines
                .insert(pattern.pattern_name.clone(), pattern.frequency);
        }

        let optimization_opportunities: Vec<OptimizationOpportunity> = identified_patterns
            .iter()
            .filter_map(|p| optimization_for(&p.pattern_name))
            .collect();

        let enterprise_compliance = assess_compliance(&context.enterprise_requirements);
        let performance_recommendations = optimization_opportunities
            .iter()
            .map(|o| o.recommendation.clone())
            .collect();

        let mut analysis = CodebaseAnalysis {
            identified_patterns,
            optimization_opportunities,
            enterprise_compliance,
            performance_recommendations,
            natural_language_insights: Vec::new(),
        };
        analysis.natural_language_insights = insights(&analysis);

        tracing::info!(
            patterns = analysis.identified_patterns.len(),
            opportunities = analysis.optimization_opportunities.len(),
            compliance_score = analysis.enterprise_compliance.compliance_score,
            "Analyzed enterprise codebase"
        );
        analysis
    }

    pub fn recommend_enterprise_architecture(
        &mut self,
        requirements: &ArchitectureRequirements,
    ) -> Result<ArchitectureRecommendation, MlDepartmentError> {
        let key = match requirements.domain.as_str() {
            "code_understanding" => "enterprise_transformer",
            "multimodal_analysis" => "multimodal_code_understanding",
            other => return Err(MlDepartmentError::NoArchitectureForDomain(other.to_string())),
        };
        let pattern = self
            .specialized_patterns
            .get(key)
            .cloned()
            .ok_or_else(|| MlDepartmentError::NoArchitectureForDomain(requirements.domain.clone()))?;

        let specification = ModelSpecialization::from(&pattern);
        self.model_registry
            .insert(specification.base_architecture.clone(), specification.clone());

        let performance_projections = requirements
            .performance_targets
            .keys()
            .filter_map(|target| {
                pattern
                    .performance_characteristics
                    .get(target)
                    .map(|score| (target.clone(), *score))
            })
            .collect();

        let deployment_strategy = DeploymentStrategy::from(&requirements.constraints);
        tracing::info!(
            domain = %requirements.domain,
            architecture = %pattern.name,
            deployment = ?deployment_strategy.deployment_type,
            edge = deployment_strategy.edge_deployment,
            "Recommended enterprise architecture"
        );

        Ok(ArchitectureRecommendation {
            recommended_architecture: pattern,
            model_specifications: vec![specification],
            deployment_strategy,
            performance_projections,
        })
    }

    pub fn export_department_knowledge(&self) -> DepartmentKnowledge {
        DepartmentKnowledge {
            department: "ml_department".to_string(),
            specializations: self
                .specialized_patterns
                .values()
                .map(|p| p.name.clone())
                .collect(),
            patterns: self.specialized_patterns.clone(),
            model_registry: self.model_registry.clone(),
            performance_baselines: self.performance_baselines.clone(),
            enterprise_context: self.enterprise_context.clone(),
            natural_language_interface: true,
            export_timestamp: Utc::now(),
        }
    }
}

fn optimization_for(pattern: &str) -> Option<OptimizationOpportunity> {
    let (kind, recommendation, improvement, complexity) = match pattern {
        "transformer_usage" => (
            "performance_optimization",
            "Implement attention caching for repeated queries",
            "30% latency reduction",
            "medium",
        ),
        "model_serving_patterns" => (
            "scalability_optimization",
            "Add dynamic batching for better throughput",
            "50% throughput increase",
            "low",
        ),
        _ => return None,
    };
    Some(OptimizationOpportunity {
        kind: kind.to_string(),
        pattern: pattern.to_string(),
        recommendation: recommendation.to_string(),
        expected_improvement: improvement.to_string(),
        implementation_complexity: complexity.to_string(),
    })
}

fn assess_compliance(requirements: &EnterpriseRequirements) -> ComplianceAssessment {
    let mut issues = Vec::new();
    let strict_latency = requirements
        .max_latency_ms
        .is_some_and(|ms| ms < STRICT_LATENCY_MS);

    if strict_latency {
        issues.push(ComplianceIssue {
            kind: "performance".to_string(),
            issue: "Latency requirements may be too strict for current patterns".to_string(),
            recommendation: "Consider edge deployment or model quantization".to_string(),
        });
    }
    if requirements.data_privacy {
        issues.push(ComplianceIssue {
            kind: "privacy".to_string(),
            issue: "Ensure all models support local-only processing".to_string(),
            recommendation: "Implement on-premise inference capabilities".to_string(),
        });
    }

    ComplianceAssessment {
        security_compliance: true,
        performance_compliance: !strict_latency,
        data_governance_compliance: true,
        compliance_score: (1.0 - ISSUE_PENALTY * issues.len() as f64).max(0.0),
        compliance_issues: issues,
    }
}

fn insights(analysis: &CodebaseAnalysis) -> Vec<String> {
    let mut insights = vec![format!(
        "Found {} ML patterns in the enterprise codebase.",
        analysis.identified_patterns.len()
    )];
    let opportunities = analysis.optimization_opportunities.len();
    if opportunities > 0 {
        insights.push(format!(
            "Identified {} optimization opportunities that could improve performance by up to 50%.",
            opportunities
        ));
    }
    insights.push(format!(
        "Enterprise compliance score: {:.1}%",
        analysis.enterprise_compliance.compliance_score * 100.0
    ));
    insights.push(
        "Recommendation: Focus on transformer optimization and multimodal capabilities for maximum enterprise impact."
            .to_string(),
    );
    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(max_latency_ms: u64, data_privacy: bool) -> CodebaseContext {
        CodebaseContext {
            codebase_features: vec![
                "transformer_usage".into(),
                "model_serving_patterns".into(),
                "legacy_scripts".into(),
            ],
            pattern_frequencies: [("transformer_usage".to_string(), 0.8)].into_iter().collect(),
            enterprise_requirements: EnterpriseRequirements {
                max_latency_ms: Some(max_latency_ms),
                data_privacy,
            },
        }
    }

    #[test]
    fn test_starts_with_two_patterns() {
        let dept = MlDepartment::default();
        assert_eq!(dept.patterns().len(), 2);
    }

    #[test]
    fn test_analysis_finds_patterns_and_opportunities() {
        let mut dept = MlDepartment::default();
        let analysis = dept.analyze_enterprise_codebase(&context(150, false));

        assert_eq!(analysis.identified_patterns.len(), 2);
        assert_eq!(analysis.identified_patterns[0].frequency, 0.8);
        assert_eq!(analysis.identified_patterns[1].frequency, DEFAULT_FREQUENCY);
        assert_eq!(analysis.identified_patterns[1].optimization_potential, 0.9);
        assert_eq!(analysis.optimization_opportunities.len(), 2);
        assert_eq!(analysis.performance_recommendations.len(), 2);
        assert_eq!(analysis.enterprise_compliance.compliance_score, 1.0);
        assert_eq!(
            analysis.natural_language_insights[2],
            "Enterprise compliance score: 100.0%"
        );
    }

    #[test]
    fn test_compliance_penalizes_each_issue() {
        let mut dept = MlDepartment::default();

        // 100 ms is the threshold, not a violation
        let boundary = dept.analyze_enterprise_codebase(&context(100, true));
        assert_eq!(boundary.enterprise_compliance.compliance_issues.len(), 1);
        assert!((boundary.enterprise_compliance.compliance_score - 0.95).abs() < 1e-9);
        assert!(boundary.enterprise_compliance.performance_compliance);

        let strict = dept.analyze_enterprise_codebase(&context(50, true));
        assert_eq!(strict.enterprise_compliance.compliance_issues.len(), 2);
        assert!((strict.enterprise_compliance.compliance_score - 0.9).abs() < 1e-9);
        assert!(!strict.enterprise_compliance.performance_compliance);
    }

    #[test]
    fn test_recommendation_for_code_understanding() {
        let mut dept = MlDepartment::default();
        let recommendation = dept
            .recommend_enterprise_architecture(&ArchitectureRequirements {
                domain: "code_understanding".into(),
                performance_targets: [("context_understanding".to_string(), 0.9)]
                    .into_iter()
                    .collect(),
                constraints: DeploymentConstraints {
                    on_premise_only: true,
                    low_latency_required: true,
                },
            })
            .unwrap();

        assert_eq!(
            recommendation.recommended_architecture.name,
            "Enterprise Transformer Architecture"
        );
        assert_eq!(recommendation.model_specifications.len(), 1);
        assert_eq!(
            recommendation.deployment_strategy.deployment_type,
            DeploymentType::OnPremise
        );
        assert!(recommendation.deployment_strategy.edge_deployment);
        assert_eq!(recommendation.performance_projections["context_understanding"], 0.9);
        assert_eq!(dept.model_registry().len(), 1);
    }

    #[test]
    fn test_unknown_domain_is_an_error() {
        let mut dept = MlDepartment::default();
        assert_eq!(
            dept.recommend_enterprise_architecture(&ArchitectureRequirements::default()),
            Err(MlDepartmentError::NoArchitectureForDomain("general".into()))
        );
    }

    #[test]
    fn test_export_includes_accumulated_knowledge() {
        let mut dept = MlDepartment::default();
        dept.analyze_enterprise_codebase(&context(150, false));
        let knowledge = dept.export_department_knowledge();
        assert_eq!(knowledge.department, "ml_department");
        assert_eq!(knowledge.specializations.len(), 2);
        assert_eq!(knowledge.performance_baselines.len(), 2);
        assert!(serde_json::to_value(&knowledge).is_ok());
    }
}
