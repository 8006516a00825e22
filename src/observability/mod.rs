// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types live in [`messages`], one submodule per subsystem. Each is a
//! small struct with a `Display` implementation and a [`StructuredLog`]
//! implementation that emits the same text together with typed fields, so
//! log lines stay consistent and nothing relies on scattered format strings.
//!
//! [`init_tracing`] installs the process-wide subscriber. Output always goes to
//! stderr: the language server owns stdout for protocol frames.
//!
//! [`StructuredLog`]: messages::StructuredLog

pub mod messages;

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.filter` from the config file.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match config.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("tracing subscriber already installed: {}", e);
    }
}
