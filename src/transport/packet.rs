// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::TransportError;
use crate::utils::{canonical_hash, short_hash};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Length of a context hash in hex characters
pub const CONTEXT_HASH_LEN: usize = 16;

/// What kind of organization artifact carries the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Issue,
    Pr,
    Discussion,
    Code,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Issue => "issue",
            ContentType::Pr => "pr",
            ContentType::Discussion => "discussion",
            ContentType::Code => "code",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(ContentType::Issue),
            "pr" => Ok(ContentType::Pr),
            "discussion" => Ok(ContentType::Discussion),
            "code" => Ok(ContentType::Code),
            other => Err(TransportError::UnknownContentType(other.to_string())),
        }
    }
}

/// Unit of context moved across a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPacket {
    pub source_org: String,
    pub target_org: String,
    pub content_type: ContentType,
    pub content: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub priority: u8,
    pub context_hash: String,
    pub dependencies: Vec<String>,
}

pub fn validate_priority(priority: u8) -> Result<u8, TransportError> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(priority)
    } else {
        Err(TransportError::InvalidPriority(priority))
    }
}

/// First 16 hex characters of the canonical content hash
pub fn context_hash(content: &Map<String, Value>) -> Result<String, serde_json::Error> {
    let digest = canonical_hash(content)?;
    Ok(short_hash(&digest, CONTEXT_HASH_LEN).to_string())
}

/// `repo:`, `user:` and `org:` references found in the content, in that order
pub fn extract_dependencies(content: &Map<String, Value>) -> Vec<String> {
    [("repository", "repo"), ("user", "user"), ("organization", "org")]
        .iter()
        .filter_map(|(field, prefix)| {
            content.get(*field).map(|value| match value {
                Value::String(s) => format!("{}:{}", prefix, s),
                other => format!("{}:{}", prefix, other),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_dependencies_follow_field_order() {
        let c = content(json!({
            "organization": "cogcities",
            "repository": "cogpilot/cognitive-architecture",
            "title": "Fractal Organization Principles",
        }));
        assert_eq!(
            extract_dependencies(&c),
            vec!["repo:cogpilot/cognitive-architecture", "org:cogcities"]
        );
    }

    #[test]
    fn test_context_hash_is_short_and_order_independent() {
        let a = content(json!({"title": "x", "user": "ada"}));
        let b = content(json!({"user": "ada", "title": "x"}));
        let hash = context_hash(&a).unwrap();
        assert_eq!(hash.len(), 16);
        assert_eq!(hash, context_hash(&b).unwrap());
    }

    #[test]
    fn test_priority_bounds() {
        assert!(validate_priority(1).is_ok());
        assert!(validate_priority(5).is_ok());
        assert_eq!(validate_priority(0), Err(TransportError::InvalidPriority(0)));
        assert_eq!(validate_priority(6), Err(TransportError::InvalidPriority(6)));
    }
}
