//! `tracing` subscriber setup.

use anyhow::{anyhow, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::AgentConfig;

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`;
/// `format` is `json` or anything else for human-readable text.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// [`init_tracing`] with the level and format from `config`.
pub fn init_from_config(config: &AgentConfig) -> Result<()> {
    init_tracing(&config.log_level, &config.log_format)
}
