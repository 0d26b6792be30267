//! Health check endpoints
//!
//! Provides endpoints for monitoring and container orchestration:
//! - `/health` - Full health check with dependency status
//! - `/health/ready` - Readiness check
//! - `/health/live` - Liveness check

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{apim::ServerRole, AppState};

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Configuration check result
#[derive(Debug, Serialize)]
pub struct ConfigCheck {
    pub status: HealthStatus,
    pub latency_ms: u64,
    pub publisher_configured: bool,
    pub store_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Dependency checks collection
#[derive(Debug, Serialize)]
pub struct DependencyChecks {
    pub auth_config: ConfigCheck,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub checks: DependencyChecks,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Read the auth configuration.
///
/// Unreadable configuration is unhealthy. Readable configuration is
/// degraded unless both the Publisher and Developer Portal URLs resolve,
/// since a proxied request to an unresolved role gets a 400.
async fn check_auth_config(state: &AppState) -> ConfigCheck {
    let start = Instant::now();

    match state.auth_config.auth_configs().await {
        Ok(configs) => {
            let publisher_configured = configs
                .as_ref()
                .and_then(|c| c.server_url(ServerRole::Publisher))
                .is_some();
            let store_configured = configs
                .as_ref()
                .and_then(|c| c.server_url(ServerRole::Store))
                .is_some();

            ConfigCheck {
                status: if publisher_configured && store_configured {
                    HealthStatus::Healthy
                } else {
                    HealthStatus::Degraded
                },
                latency_ms: start.elapsed().as_millis() as u64,
                publisher_configured,
                store_configured,
                error: None,
            }
        }
        Err(e) => ConfigCheck {
            status: HealthStatus::Unhealthy,
            latency_ms: start.elapsed().as_millis() as u64,
            publisher_configured: false,
            store_configured: false,
            error: Some(e.to_string()),
        },
    }
}

/// Full health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let config_check = check_auth_config(&state).await;
    let overall_status = config_check.status.clone();

    let response = HealthResponse {
        status: overall_status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: DependencyChecks {
            auth_config: config_check,
        },
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Readiness check endpoint
///
/// Returns 503 when the auth configuration cannot be read.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    let config_check = check_auth_config(&state).await;

    if config_check.status == HealthStatus::Unhealthy {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SimpleHealthResponse {
                status: HealthStatus::Unhealthy,
            }),
        );
    }

    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}

/// Liveness check endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
