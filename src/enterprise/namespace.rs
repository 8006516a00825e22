// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceType {
    CognitiveCity,
    Workbench,
    Department,
    TransportHub,
}

impl NamespaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceType::CognitiveCity => "cognitive_city",
            NamespaceType::Workbench => "workbench",
            NamespaceType::Department => "department",
            NamespaceType::TransportHub => "transport_hub",
        }
    }

    /// Infrastructure first, then live collaboration, then cities
    pub fn routing_priority(&self) -> u32 {
        match self {
            NamespaceType::TransportHub => 100,
            NamespaceType::Workbench => 80,
            NamespaceType::CognitiveCity => 60,
            NamespaceType::Department => 50,
        }
    }

    pub fn bandwidth_requirements(&self) -> BTreeMap<String, String> {
        let mut requirements: BTreeMap<String, String> = [
            ("control_traffic", "low"),
            ("knowledge_sync", "medium"),
            ("collaboration_streams", "high"),
            ("bulk_transfers", "variable"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        if *self == NamespaceType::Workbench {
            requirements.insert("collaboration_streams".into(), "very_high".into());
            requirements.insert("real_time_synthesis".into(), "high".into());
        }
        requirements
    }
}

impl fmt::Display for NamespaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of repositories, optionally with nested groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoGroup {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, RepoGroup>,
}

impl RepoGroup {
    pub(crate) fn new(description: impl Into<String>, repos: Vec<String>) -> Self {
        Self {
            description: description.into(),
            repos,
            groups: BTreeMap::new(),
        }
    }

    /// `<prefix>-<suffix>` for every suffix
    pub(crate) fn prefixed(description: impl Into<String>, prefix: &str, suffixes: &[&str]) -> Self {
        Self::new(
            description,
            suffixes
                .iter()
                .map(|s| format!("{}-{}", prefix, s))
                .collect(),
        )
    }

    pub(crate) fn plain(description: impl Into<String>, repos: &[&str]) -> Self {
        Self::new(description, repos.iter().map(|r| r.to_string()).collect())
    }

    /// Repositories in this group and every nested group
    pub fn repo_count(&self) -> usize {
        self.repos.len() + self.groups.values().map(RepoGroup::repo_count).sum::<usize>()
    }
}

/// An organization inside the enterprise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseNamespace {
    pub org_name: String,
    pub namespace_type: NamespaceType,
    pub owner_model: String,
    pub specialization_domains: Vec<String>,
    pub repository_structure: BTreeMap<String, RepoGroup>,
    pub collaboration_interfaces: Vec<String>,
    pub neural_endpoints: BTreeMap<String, String>,
    /// Per-model channels, only populated for workbenches
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model_channels: BTreeMap<String, String>,
}

impl EnterpriseNamespace {
    /// Entry point other namespaces route to
    pub fn primary_endpoint(&self) -> &str {
        ["primary_interface", "workbench_hub", "primary_router"]
            .iter()
            .find_map(|key| self.neural_endpoints.get(*key))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn endpoint_count(&self) -> usize {
        self.neural_endpoints.len() + self.model_channels.len()
    }

    pub fn repo_count(&self) -> usize {
        self.repository_structure
            .values()
            .map(RepoGroup::repo_count)
            .sum()
    }
}

/// Routing-table entry kept for every namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub primary_endpoint: String,
    pub specializations: Vec<String>,
    pub collaboration_protocols: Vec<String>,
    pub routing_priority: u32,
    pub bandwidth_requirements: BTreeMap<String, String>,
}

impl From<&EnterpriseNamespace> for RouteEntry {
    fn from(namespace: &EnterpriseNamespace) -> Self {
        Self {
            primary_endpoint: namespace.primary_endpoint().to_string(),
            specializations: namespace.specialization_domains.clone(),
            collaboration_protocols: namespace.collaboration_interfaces.clone(),
            routing_priority: namespace.namespace_type.routing_priority(),
            bandwidth_requirements: namespace.namespace_type.bandwidth_requirements(),
        }
    }
}

pub(crate) fn endpoints(org_name: &str, entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, path)| (key.to_string(), format!("neural://{}/{}", org_name, path)))
        .collect()
}

pub(crate) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_priorities() {
        assert_eq!(NamespaceType::TransportHub.routing_priority(), 100);
        assert_eq!(NamespaceType::Workbench.routing_priority(), 80);
        assert_eq!(NamespaceType::CognitiveCity.routing_priority(), 60);
        assert_eq!(NamespaceType::Department.routing_priority(), 50);
    }

    #[test]
    fn test_workbench_bandwidth_is_boosted() {
        let city = NamespaceType::CognitiveCity.bandwidth_requirements();
        let bench = NamespaceType::Workbench.bandwidth_requirements();
        assert_eq!(city["collaboration_streams"], "high");
        assert_eq!(bench["collaboration_streams"], "very_high");
        assert_eq!(bench["real_time_synthesis"], "high");
        assert!(!city.contains_key("real_time_synthesis"));
    }

    #[test]
    fn test_nested_repo_count() {
        let mut group = RepoGroup::plain("top", &["a", "b"]);
        group
            .groups
            .insert("inner".into(), RepoGroup::prefixed("inner", "x", &["1", "2", "3"]));
        assert_eq!(group.repo_count(), 5);
        assert_eq!(group.groups["inner"].repos[0], "x-1");
    }
}
