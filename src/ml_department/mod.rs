// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Enterprise ML specialization.
//!
//! [`MlDepartment`] keeps a small library of [`EnterpriseMlPattern`]s, analyzes
//! codebases against it and turns architecture requirements into model
//! specifications plus a deployment strategy.

mod department;
mod patterns;

pub use department::{
    ArchitectureRecommendation, ArchitectureRequirements, CodebaseAnalysis, CodebaseContext,
    ComplianceAssessment, ComplianceIssue, DepartmentKnowledge, DeploymentConstraints,
    DeploymentStrategy, DeploymentType, EnterpriseRequirements, IdentifiedPattern, MlDepartment,
    MonitoringPlan, OptimizationOpportunity,
};
pub use patterns::{EnterpriseMlPattern, ModelSpecialization};
