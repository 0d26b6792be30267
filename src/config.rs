//! Configuration management for the APIM proxy
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// APIM Publisher base URL (`auth.configs.properties.publisherUrl`)
    pub publisher_url: Option<String>,
    /// APIM Developer Portal base URL (`auth.configs.properties.storeUrl`)
    pub store_url: Option<String>,
    /// JSON deployment file holding `auth.configs`; re-read on every request.
    /// Takes precedence over the URL variables when set.
    pub auth_config_file: Option<PathBuf>,

    /// Timeout for outbound APIM calls (in seconds)
    pub upstream_timeout_seconds: u64,
    /// Accept self-signed certificates from the APIM server
    pub accept_invalid_certs: bool,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("APIM_PROXY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("APIM_PROXY_PORT")
                .unwrap_or_else(|_| "9643".to_string())
                .parse()
                .context("Invalid APIM_PROXY_PORT")?,

            publisher_url: non_empty_var("APIM_PUBLISHER_URL"),
            store_url: non_empty_var("APIM_STORE_URL"),
            auth_config_file: non_empty_var("APIM_AUTH_CONFIG_FILE").map(PathBuf::from),

            upstream_timeout_seconds: env::var("APIM_UPSTREAM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid APIM_UPSTREAM_TIMEOUT_SECONDS")?,
            accept_invalid_certs: env::var("APIM_ACCEPT_INVALID_CERTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            json_logs: env::var("APIM_PROXY_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Timeout applied to every outbound APIM call
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
