// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::build::SystemSpecification;
use crate::config::consts::{
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_LOG_FILTER, DEFAULT_MAX_FRAME_BYTES,
    DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_MCP_HOST, DEFAULT_MCP_PORT, DEFAULT_STORE_PATH,
    DEFAULT_SWARM_ITERATIONS, DEFAULT_SWARM_PARTICLES, DEFAULT_SWARM_PATIENCE,
    DEFAULT_SWARM_SEED, DEFAULT_SWARM_TOLERANCE,
};
use crate::errors::{ConfigError, FailureStrategy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level application configuration.
///
/// Every section is optional in the file and falls back to its defaults, so an
/// empty document is a valid configuration.
///
/// # Example
/// ```yaml
/// mcp:
///   host: 0.0.0.0
///   port: 8765
/// builder:
///   store_path: /gnu/store
///   max_concurrency: 4
///   failure_strategy: continue_on_error
/// swarm:
///   dimensions: 64
///   seed: 7
/// logging:
///   filter: "cognitive_ecology=debug"
///   format: compact
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mcp: McpConfig,
    pub lsp: LspConfig,
    pub builder: BuilderConfig,
    pub swarm: SwarmSettings,
    pub logging: LoggingConfig,
}

/// WebSocket protocol server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    pub host: String,
    pub port: u16,
    pub max_message_bytes: usize,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MCP_HOST.to_string(),
            port: DEFAULT_MCP_PORT,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl McpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Language server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LspConfig {
    pub max_frame_bytes: usize,
}

impl Default for LspConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

/// Reproducible builder settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub store_path: PathBuf,
    /// Falls back to the number of available CPU cores when unset
    pub max_concurrency: Option<usize>,
    pub failure_strategy: FailureStrategy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            max_concurrency: None,
            failure_strategy: FailureStrategy::default(),
        }
    }
}

impl BuilderConfig {
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}

/// Particle swarm settings used when encoding memory patterns
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwarmSettings {
    pub particles: usize,
    pub iterations: usize,
    pub dimensions: usize,
    pub seed: u64,
    pub tolerance: f64,
    pub patience: usize,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            particles: DEFAULT_SWARM_PARTICLES,
            iterations: DEFAULT_SWARM_ITERATIONS,
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            seed: DEFAULT_SWARM_SEED,
            tolerance: DEFAULT_SWARM_TOLERANCE,
            patience: DEFAULT_SWARM_PATIENCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Reject values that would leave a subsystem unable to make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.builder.max_concurrency == Some(0) {
            return Err(ConfigError::Invalid {
                field: "builder.max_concurrency",
                reason: "must be at least 1".into(),
            });
        }
        if self.lsp.max_frame_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "lsp.max_frame_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.mcp.max_message_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "mcp.max_message_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        let swarm = &self.swarm;
        if swarm.particles == 0 || swarm.iterations == 0 || swarm.dimensions == 0 {
            return Err(ConfigError::Invalid {
                field: "swarm",
                reason: "particles, iterations and dimensions must all be non-zero".into(),
            });
        }
        if swarm.tolerance.is_nan() || swarm.tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "swarm.tolerance",
                reason: format!("must be a non-negative number, got {}", swarm.tolerance),
            });
        }
        Ok(())
    }
}

/// Deserialize a YAML or TOML document, picking the format from the file extension.
fn load_document<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat { extension }),
    }
}

/// Load and validate the application config from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = load_document(path)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load an AI system specification used to produce build blueprints
pub fn load_system_specification<P: AsRef<Path>>(
    path: P,
) -> Result<SystemSpecification, ConfigError> {
    load_document(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let cfg: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.mcp.port, DEFAULT_MCP_PORT);
        assert_eq!(cfg.mcp.host, "localhost");
        assert_eq!(cfg.swarm.dimensions, 768);
        assert_eq!(cfg.builder.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(cfg.logging.format, LogFormat::Full);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_with_partial_sections() {
        let file = write_temp(
            ".yaml",
            r#"
mcp:
  port: 9001
builder:
  max_concurrency: 3
  failure_strategy: continue_on_error
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.mcp.port, 9001);
        assert_eq!(cfg.mcp.host, "localhost");
        assert_eq!(cfg.builder.effective_concurrency(), 3);
        assert_eq!(
            cfg.builder.failure_strategy,
            FailureStrategy::ContinueOnError
        );
        assert_eq!(cfg.mcp.bind_address(), "localhost:9001");
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            r#"
[swarm]
dimensions = 32
seed = 7

[logging]
filter = "debug"
format = "compact"
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.swarm.dimensions, 32);
        assert_eq!(cfg.swarm.seed, 7);
        assert_eq!(cfg.swarm.particles, DEFAULT_SWARM_PARTICLES);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".ini", "port=1");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { ref extension } if extension == "ini"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let file = write_temp(".yml", "builder:\n  max_concurrency: 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("builder.max_concurrency"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
