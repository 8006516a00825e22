// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Enterprise namespace builder.
//!
//! Every AI model gets a cognitive city organization, projects get shared
//! workbenches, and one transport hub carries the enterprise's routing
//! infrastructure. Each namespace is entered into a routing table with a
//! priority and bandwidth profile derived from its [`NamespaceType`].

mod architecture;
mod namespace;

pub use architecture::{CognitiveEnterprise, EnterpriseManifest, NeuralTopology};
pub use namespace::{EnterpriseNamespace, NamespaceType, RepoGroup, RouteEntry};
