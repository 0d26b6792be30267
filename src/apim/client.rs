//! APIM API client
//!
//! HTTP client for the Publisher and Developer Portal listing endpoints.

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::{apim::Resource, error::AppResult};

/// Upstream status and fully drained body.
///
/// The connection is returned to the pool before this value exists, so
/// dropping it on any path is the only cleanup needed.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON, consuming the response
    pub fn json<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Trait defining the upstream APIM operations
///
/// `endpoint` is the versioned base, e.g. `https://host/api/am/publisher/v1`.
/// The access token is sent as a bearer credential.
#[async_trait]
pub trait ApimClient: Send + Sync {
    /// `GET {endpoint}/apis`
    async fn get_apis(&self, endpoint: &str, access_token: &str) -> AppResult<UpstreamResponse>;

    /// `GET {endpoint}/applications`
    async fn get_applications(
        &self,
        endpoint: &str,
        access_token: &str,
    ) -> AppResult<UpstreamResponse>;
}

/// reqwest-backed APIM client
pub struct HttpApimClient {
    client: reqwest::Client,
}

impl HttpApimClient {
    /// Create a new APIM client
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self, access_token), fields(operation = resource.operation(), token_len = access_token.len()))]
    async fn fetch(
        &self,
        resource: Resource,
        endpoint: &str,
        access_token: &str,
    ) -> AppResult<UpstreamResponse> {
        let url = format!("{}{}", endpoint, resource.path());

        debug!(url = %url, "Calling APIM");

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "Failed to send request to APIM");
                e
            })?;

        let status = response.status();
        debug!(status = %status, "APIM response status");

        // Drain the body on every status so the connection goes back to the pool.
        let body = response.bytes().await.map_err(|e| {
            error!(error = %e, status = %status, "Failed to read APIM response body");
            e
        })?;

        debug!(body_len = body.len(), "APIM response body received");
        Ok(UpstreamResponse { status, body })
    }
}

#[async_trait]
impl ApimClient for HttpApimClient {
    async fn get_apis(&self, endpoint: &str, access_token: &str) -> AppResult<UpstreamResponse> {
        self.fetch(Resource::Apis, endpoint, access_token).await
    }

    async fn get_applications(
        &self,
        endpoint: &str,
        access_token: &str,
    ) -> AppResult<UpstreamResponse> {
        self.fetch(Resource::Applications, endpoint, access_token)
            .await
    }
}
