// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Introspective protocol design.
//!
//! Protocols are modelled as organisms made of genes. Four meta-protocols
//! (designer, evolution, introspection, collaboration) seed a shared gene pool
//! that new designs draw from, and feedback from the environment drives
//! phase-dependent evolution.
//!
//! # Example
//!
//! ```rust
//! use cognitive_ecology::protocol_design::{DesignRequest, IntrospectiveProtocolDesigner};
//!
//! let mut designer = IntrospectiveProtocolDesigner::new();
//! designer.initialize_meta_protocol_system();
//!
//! let organism = designer
//!     .design_protocol_using_introspection(&DesignRequest {
//!         name: "Latency Monitor".into(),
//!         purpose: "Monitor protocol performance and latency".into(),
//!         ..DesignRequest::default()
//!     })
//!     .unwrap();
//! assert!(organism.organism_id.starts_with("protocol_"));
//! ```

mod designer;
mod ecosystem;
mod genome;

pub use designer::{
    validate_design, DesignRequest, DesignValidation, EcosystemPhase, EnvironmentFeedback,
    IntrospectiveProtocolDesigner,
};
pub use ecosystem::{
    CollaborationChannel, CollaborativeEcosystem, ConsensusMechanism, QualitySettings,
};
pub use genome::{MetaProtocol, ProtocolGene, ProtocolOrganism};
