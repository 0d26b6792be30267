//! APIM server URL resolution
//!
//! The `auth.configs` block of the deployment configuration names the
//! Publisher and Developer Portal hosts. It is supplied by an
//! [`AuthConfigProvider`] handed to the application state at startup and
//! consulted on every request.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Template for the versioned REST endpoint of an APIM server
const ENDPOINT: &str = "{serverUrl}/api/am/{serverName}/v1";

/// Logical role of the APIM server being called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerRole {
    Publisher,
    Store,
}

impl ServerRole {
    /// Path segment used in the REST endpoint
    pub fn as_str(self) -> &'static str {
        match self {
            ServerRole::Publisher => "publisher",
            ServerRole::Store => "store",
        }
    }

    /// Human-readable portal name
    pub fn display_name(self) -> &'static str {
        match self {
            ServerRole::Publisher => "Publisher",
            ServerRole::Store => "Developer Portal",
        }
    }
}

/// Failure to read the deployment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Deployment file layout; only `auth.configs` is consulted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploymentConfig {
    #[serde(rename = "auth.configs")]
    pub auth_configs: Option<AuthConfigs>,
}

/// The `auth.configs` object
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AuthConfigs {
    pub properties: Option<AuthProperties>,
}

/// The `auth.configs.properties` map. Other keys in the map are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthProperties {
    pub publisher_url: Option<String>,
    pub store_url: Option<String>,
}

impl AuthConfigs {
    /// Resolve the base URL for `role`.
    ///
    /// The store falls back to the publisher URL when `storeUrl` is unset.
    /// Returns `None` when `properties` is absent or the URL is not configured.
    pub fn server_url(&self, role: ServerRole) -> Option<&str> {
        let properties = self.properties.as_ref()?;
        match role {
            ServerRole::Publisher => properties.publisher_url.as_deref(),
            ServerRole::Store => properties
                .store_url
                .as_deref()
                .or(properties.publisher_url.as_deref()),
        }
    }
}

/// Build `{serverUrl}/api/am/{serverName}/v1`
pub fn endpoint(server_url: &str, role: ServerRole) -> String {
    ENDPOINT
        .replace("{serverUrl}", server_url.trim_end_matches('/'))
        .replace("{serverName}", role.as_str())
}

/// Source of the `auth.configs` block
#[async_trait]
pub trait AuthConfigProvider: Send + Sync {
    /// Current `auth.configs`, or `None` when the block is absent
    async fn auth_configs(&self) -> Result<Option<AuthConfigs>, ConfigError>;

    /// Resolve the base URL for `role` from the current configuration
    async fn server_url(&self, role: ServerRole) -> Result<Option<String>, ConfigError> {
        let configs = self.auth_configs().await?;
        Ok(configs.and_then(|c| c.server_url(role).map(str::to_string)))
    }
}

/// Configuration fixed at startup
#[derive(Debug, Clone, Default)]
pub struct StaticAuthConfig {
    configs: Option<AuthConfigs>,
}

impl StaticAuthConfig {
    pub fn new(configs: Option<AuthConfigs>) -> Self {
        Self { configs }
    }

    /// Build from the two URL settings. With neither set the block is absent.
    pub fn from_urls(publisher_url: Option<String>, store_url: Option<String>) -> Self {
        if publisher_url.is_none() && store_url.is_none() {
            return Self::default();
        }
        Self::new(Some(AuthConfigs {
            properties: Some(AuthProperties {
                publisher_url,
                store_url,
            }),
        }))
    }
}

#[async_trait]
impl AuthConfigProvider for StaticAuthConfig {
    async fn auth_configs(&self) -> Result<Option<AuthConfigs>, ConfigError> {
        Ok(self.configs.clone())
    }
}

/// Configuration read from a JSON deployment file on every call
#[derive(Debug, Clone)]
pub struct FileAuthConfig {
    path: PathBuf,
}

impl FileAuthConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AuthConfigProvider for FileAuthConfig {
    async fn auth_configs(&self) -> Result<Option<AuthConfigs>, ConfigError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| ConfigError::Read {
                path: self.path.clone(),
                source,
            })?;

        let deployment: DeploymentConfig =
            serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            has_auth_configs = deployment.auth_configs.is_some(),
            "Loaded deployment configuration"
        );
        Ok(deployment.auth_configs)
    }
}
