//! Configuration loading and validation for the capsule server.
//!
//! All values are read from `CREDSEAL_*` environment variables when the
//! `run` subcommand starts. The process exits with a clear error message if
//! any value cannot be parsed or fails validation.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated capsule server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Host the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    4500
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from `CREDSEAL_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("CREDSEAL"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("CREDSEAL_HOST must not be empty");
        }
        if self.port == 0 {
            anyhow::bail!("CREDSEAL_PORT must be non-zero");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("CREDSEAL_REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}
