//! APIM proxy - read-only proxy for API Manager listings
//!
//! Forwards API and application listing requests from the analytics
//! dashboard to the API Manager Publisher and Developer Portal, using an
//! access token assembled from the dashboard session cookies.

pub mod apim;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

pub use crate::apim::{
    ApimClient, AuthConfigProvider, FileAuthConfig, HttpApimClient, StaticAuthConfig,
};
pub use crate::config::Config;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Source of the `auth.configs` block, consulted on every request
    pub auth_config: Arc<dyn AuthConfigProvider>,
    /// Client for the upstream APIM REST APIs
    pub apim_client: Arc<dyn ApimClient>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .timeout(config.upstream_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;

        let apim_client: Arc<dyn ApimClient> = Arc::new(HttpApimClient::new(http_client));

        let auth_config: Arc<dyn AuthConfigProvider> = match &config.auth_config_file {
            Some(path) => {
                info!(path = %path.display(), "Reading auth.configs from deployment file");
                Arc::new(FileAuthConfig::new(path))
            }
            None => Arc::new(StaticAuthConfig::from_urls(
                config.publisher_url.clone(),
                config.store_url.clone(),
            )),
        };

        Ok(Self::from_parts(config, auth_config, apim_client))
    }

    /// Assemble state from explicit collaborators
    pub fn from_parts(
        config: Config,
        auth_config: Arc<dyn AuthConfigProvider>,
        apim_client: Arc<dyn ApimClient>,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            auth_config,
            apim_client,
        }
    }

    /// Create state for tests: env-free config with the given collaborators
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(
        auth_config: Arc<dyn AuthConfigProvider>,
        apim_client: Arc<dyn ApimClient>,
    ) -> Self {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            publisher_url: None,
            store_url: None,
            auth_config_file: None,
            upstream_timeout_seconds: 5,
            accept_invalid_certs: false,
            json_logs: false,
        };
        Self::from_parts(config, auth_config, apim_client)
    }
}
