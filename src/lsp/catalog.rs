// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::{json, Value};

const HOVER_TABLE: [(&str, &str); 9] = [
    (
        "CognitiveCity",
        "**CognitiveCity**: A GitHub organization functioning as a cognitive city with neural transport capabilities.",
    ),
    (
        "ContextualMemoryPattern",
        "**ContextualMemoryPattern**: Patterns of action and execution traces for progressive encoding.",
    ),
    (
        "OperationalizedRAGFabric",
        "**OperationalizedRAGFabric**: Links project imperatives to agent-based issue clustering.",
    ),
    (
        "NeuralTransportNetwork",
        "**NeuralTransportNetwork**: High-bandwidth communication system between cognitive cities.",
    ),
    (
        "particle_swarm",
        "**Particle Swarm**: LLM-as-particle-swarm-accelerator for distributed cognition optimization.",
    ),
    (
        "activation_landscape",
        "**Activation Landscape**: Current state of cognitive activation across different specializations.",
    ),
    (
        "salience_score",
        "**Salience Score**: Measure of importance/relevance of a memory pattern or cognitive element.",
    ),
    (
        "enterprise_ai",
        "**Enterprise AI**: AI systems designed for enterprise-scale cognitive architectures.",
    ),
    (
        "neural_transport",
        "**Neural Transport**: Communication protocol for inter-organizational cognitive data transfer.",
    ),
];

/// Markdown shown when hovering a known architecture term
pub fn hover_text(word: &str) -> Option<&'static str> {
    HOVER_TABLE
        .iter()
        .find(|(term, _)| *term == word)
        .map(|(_, text)| *text)
}

// LSP CompletionItemKind values
const KIND_METHOD: u8 = 2;
const KIND_FIELD: u8 = 5;
const KIND_CLASS: u8 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionItem {
    pub label: &'static str,
    pub kind: u8,
    pub detail: &'static str,
    pub documentation: &'static str,
}

const COMPLETIONS: [CompletionItem; 7] = [
    CompletionItem {
        label: "CognitiveCity",
        kind: KIND_CLASS,
        detail: "GitHub organization as cognitive city",
        documentation: "Represents a GitHub organization functioning as a cognitive city",
    },
    CompletionItem {
        label: "ContextualMemoryPattern",
        kind: KIND_CLASS,
        detail: "Memory pattern for cognitive encoding",
        documentation: "Patterns of action and execution traces",
    },
    CompletionItem {
        label: "neural_transport_channels",
        kind: KIND_FIELD,
        detail: "Dict[str, str]",
        documentation: "Neural transport communication channels",
    },
    CompletionItem {
        label: "activation_landscape",
        kind: KIND_FIELD,
        detail: "Dict[str, float]",
        documentation: "Current cognitive activation state",
    },
    CompletionItem {
        label: "salience_score",
        kind: KIND_FIELD,
        detail: "float",
        documentation: "Importance score of memory pattern",
    },
    CompletionItem {
        label: "particle_swarm_optimize",
        kind: KIND_METHOD,
        detail: "async def particle_swarm_optimize(pattern)",
        documentation: "Optimize memory encoding using particle swarm",
    },
    CompletionItem {
        label: "register_cognitive_city",
        kind: KIND_METHOD,
        detail: "async def register_cognitive_city(city)",
        documentation: "Register new cognitive city in network",
    },
];

pub fn completion_items() -> &'static [CompletionItem] {
    &COMPLETIONS
}

/// Capabilities advertised in the `initialize` result
pub fn server_capabilities() -> Value {
    json!({
        "textDocumentSync": 1,
        "hoverProvider": true,
        "completionProvider": {
            "triggerCharacters": [".", ":", "@"],
            "resolveProvider": false
        },
        "definitionProvider": true,
        "documentSymbolProvider": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_lookup() {
        assert!(hover_text("salience_score")
            .unwrap()
            .starts_with("**Salience Score**"));
        assert_eq!(hover_text("salience"), None);
    }

    #[test]
    fn test_completion_kinds() {
        let items = completion_items();
        assert_eq!(items.len(), 7);
        assert_eq!(items.iter().filter(|i| i.kind == KIND_CLASS).count(), 2);
    }
}
