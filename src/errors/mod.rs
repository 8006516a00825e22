// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod domain;
mod execution;
mod protocol;
mod validation;

pub use config::ConfigError;
pub use domain::{BlueprintError, DesignError, EnterpriseError, MlDepartmentError, TransportError};
pub use execution::{BuildError, FailureStrategy};
pub use protocol::{LspCodecError, LspError, McpError};
pub use validation::ValidationError;
