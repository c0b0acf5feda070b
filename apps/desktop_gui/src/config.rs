//! Startup configuration: the analysis service base URL.

use clap::Parser;
use client_core::{TransportConfig, DEFAULT_BACKEND_URL};
use thiserror::Error;
use url::Url;

pub const BACKEND_URL_ENV: &str = "LEGAL_CONSULTANT_BACKEND_URL";

#[derive(Parser, Debug, Default)]
#[command(name = "legal-consultant", about = "Desktop client for the legal analysis service")]
pub struct Args {
    /// Base URL of the analysis service (overrides LEGAL_CONSULTANT_BACKEND_URL).
    #[arg(long)]
    pub backend_url: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid backend url '{value}': {reason}")]
    InvalidBackendUrl { value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub transport: TransportConfig,
}

impl StartupConfig {
    pub fn backend_url(&self) -> &Url {
        self.transport.base_url()
    }
}

/// Flag first, then environment, then the built-in default. Blank values
/// count as unset.
pub fn resolve(args: &Args, env_value: Option<String>) -> Result<StartupConfig, ConfigError> {
    let raw = [args.backend_url.clone(), env_value]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    Ok(StartupConfig {
        transport: TransportConfig::new(parse_backend_url(&raw)?),
    })
}

pub fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBackendUrl {
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

pub fn read_non_empty_env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => {
            tracing::debug!(name, "environment variable set but empty");
            None
        }
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
