//! Health and documentation endpoint integration tests
//!
//! - GET /health - Full health check with configuration status
//! - GET /health/ready - Readiness check
//! - GET /health/live - Liveness check
//! - GET /apim/docs/openapi.json - OpenAPI document

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{constants, test_server, urls, RecordingApimClient, UnreadableAuthConfig};

fn idle_client() -> Arc<RecordingApimClient> {
    RecordingApimClient::new(StatusCode::OK, "{}")
}

#[tokio::test]
async fn test_health_endpoint_reports_configuration() {
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), idle_client());

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["auth_config"]["publisher_configured"], true);
    // Store resolves through the publisher fallback
    assert_eq!(body["checks"]["auth_config"]["store_configured"], true);
}

#[tokio::test]
async fn test_health_degraded_without_urls() {
    let server = test_server(urls(None, None), idle_client());

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "degraded");
}

#[tokio::test]
async fn test_health_degraded_with_store_url_only() {
    let server = test_server(urls(None, Some(constants::STORE_URL)), idle_client());

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["auth_config"]["publisher_configured"], false);
    assert_eq!(body["checks"]["auth_config"]["store_configured"], true);
}

#[tokio::test]
async fn test_readiness_fails_when_configuration_unreadable() {
    let server = test_server(Arc::new(UnreadableAuthConfig), idle_client());

    let response = server.get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["status"], "unhealthy");

    server
        .get("/health")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_liveness_always_ok() {
    let server = test_server(Arc::new(UnreadableAuthConfig), idle_client());

    let response = server.get("/health/live").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let server = test_server(urls(None, None), idle_client());

    let response = server.get("/apim/docs/openapi.json").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert!(body["paths"]["/apim/apis"]["get"].is_object());
    assert!(body["paths"]["/apim/applications"]["get"].is_object());
}
