//! APIM integration module
//!
//! Provides server URL resolution, the upstream client and the payloads
//! exchanged with the API Manager REST APIs.

pub mod client;
pub mod models;
pub mod server;

pub use client::{ApimClient, HttpApimClient, UpstreamResponse};
pub use models::*;
pub use server::{
    endpoint, AuthConfigProvider, AuthConfigs, AuthProperties, ConfigError, FileAuthConfig,
    ServerRole, StaticAuthConfig,
};

/// A listing proxied from APIM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// `GET /apis` on the Publisher
    Apis,
    /// `GET /applications` on the Developer Portal
    Applications,
}

impl Resource {
    /// Server role hosting this listing
    pub fn role(self) -> ServerRole {
        match self {
            Resource::Apis => ServerRole::Publisher,
            Resource::Applications => ServerRole::Store,
        }
    }

    /// Path appended to the versioned endpoint
    pub fn path(self) -> &'static str {
        match self {
            Resource::Apis => "/apis",
            Resource::Applications => "/applications",
        }
    }

    /// Label used in logs and metrics
    pub fn operation(self) -> &'static str {
        match self {
            Resource::Apis => "list_apis",
            Resource::Applications => "list_applications",
        }
    }

    /// Caller-facing message when APIM answers with a non-200 status
    pub fn failure_message(self) -> &'static str {
        match self {
            Resource::Apis => "Unable to retrieve API list.",
            Resource::Applications => "Unable to retrieve Application list.",
        }
    }
}
